use khadamat::api::{ApiClient, TokenSource};
use khadamat::config::AppConfig;
use khadamat::error::AppError;
use khadamat::lookup::LookupTable;
use khadamat::models::{Coordinates, PaymentMethod};
use khadamat::session::SessionStore;
use khadamat::storage::FileStore;
use khadamat::telemetry;
use std::sync::Arc;
use tracing::debug;

/// Everything a command needs, wired once per invocation.
pub(crate) struct Context {
    pub(crate) config: AppConfig,
    pub(crate) session: Arc<SessionStore<FileStore>>,
    pub(crate) client: ApiClient,
}

pub(crate) fn bootstrap() -> Result<Context, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = Arc::new(FileStore::new(config.storage.path.clone()));
    let session = Arc::new(SessionStore::new(store));
    session.initialize();
    debug!(
        environment = ?config.environment,
        authenticated = session.is_authenticated(),
        "session restored"
    );

    let tokens: Arc<dyn TokenSource> = session.clone();
    let client = ApiClient::new(&config.api, tokens)?;

    Ok(Context {
        config,
        session,
        client,
    })
}

pub(crate) fn parse_payment_method(raw: &str) -> Result<PaymentMethod, String> {
    PaymentMethod::parse(raw).ok_or_else(|| format!("unknown payment method '{raw}' (card, bnpl)"))
}

pub(crate) fn parse_lookup_table(raw: &str) -> Result<LookupTable, String> {
    match raw.trim().to_ascii_lowercase().replace('_', "-").as_str() {
        "nationalities" => Ok(LookupTable::Nationalities),
        "emirates" => Ok(LookupTable::Emirates),
        "languages" => Ok(LookupTable::Languages),
        "skills" => Ok(LookupTable::Skills),
        "office-scopes" | "scopes" => Ok(LookupTable::OfficeScopes),
        "religions" => Ok(LookupTable::Religions),
        _ => Err(format!(
            "unknown table '{raw}' \
             (nationalities, emirates, languages, skills, office-scopes, religions)"
        )),
    }
}

pub(crate) fn parse_coordinates(raw: &str) -> Result<Coordinates, String> {
    let (lat, lon) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lon', got '{raw}'"))?;
    let latitude = lat
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse latitude '{lat}' ({err})"))?;
    let longitude = lon
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse longitude '{lon}' ({err})"))?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("coordinates out of range: {latitude},{longitude}"));
    }
    Ok(Coordinates::new(latitude, longitude))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_table_names() {
        assert_eq!(parse_lookup_table("office_scopes"), Ok(LookupTable::OfficeScopes));
        assert_eq!(parse_lookup_table("Emirates"), Ok(LookupTable::Emirates));
        assert!(parse_lookup_table("planets").is_err());
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert_eq!(
            parse_coordinates("25.2048, 55.2708"),
            Ok(Coordinates::new(25.2048, 55.2708))
        );
        assert!(parse_coordinates("95,10").is_err());
        assert!(parse_coordinates("25.2").is_err());
    }

    #[test]
    fn payment_methods() {
        assert_eq!(parse_payment_method("tabby"), Ok(PaymentMethod::Bnpl));
        assert!(parse_payment_method("cash").is_err());
    }
}
