use crate::cli::{LoginArgs, UnlockArgs};
use crate::infra::Context;
use clap::Args;
use khadamat::api::{self, ApiClient, ApiError};
use khadamat::error::AppError;
use khadamat::favorites::FavoritesReconciler;
use khadamat::i18n::{self, Locale, Message};
use khadamat::lookup::LookupTable;
use khadamat::models::{
    Availability, Coordinates, Credentials, MaidFilters, MaidId, MaidSummary, Quotation, UserRole,
};
use khadamat::search::{HttpPlaceProvider, Outcome, ReverseGeocoder, SearchController};
use khadamat::wizard::{OfficeDraftPatch, OfficeWizard};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct MaidListArgs {
    /// Nationality id, e.g. PH
    #[arg(long)]
    pub(crate) nationality: Option<String>,
    /// Emirate id, e.g. DXB
    #[arg(long)]
    pub(crate) emirate: Option<String>,
    /// Language ids; repeat or comma-separate
    #[arg(long, value_delimiter = ',')]
    pub(crate) languages: Vec<String>,
    /// Skill ids; repeat or comma-separate
    #[arg(long, value_delimiter = ',')]
    pub(crate) skills: Vec<String>,
    #[arg(long)]
    pub(crate) min_age: Option<u8>,
    #[arg(long)]
    pub(crate) max_age: Option<u8>,
    /// Monthly salary floor in AED
    #[arg(long)]
    pub(crate) min_salary: Option<u32>,
    /// Monthly salary ceiling in AED
    #[arg(long)]
    pub(crate) max_salary: Option<u32>,
    /// Only workers available immediately
    #[arg(long)]
    pub(crate) available_now: bool,
    #[arg(long)]
    pub(crate) page: Option<u32>,
    #[arg(long)]
    pub(crate) limit: Option<u32>,
}

impl From<MaidListArgs> for MaidFilters {
    fn from(args: MaidListArgs) -> Self {
        Self {
            nationality: args.nationality,
            emirate: args.emirate,
            languages: args.languages,
            skills: args.skills,
            min_age: args.min_age,
            max_age: args.max_age,
            min_salary: args.min_salary,
            max_salary: args.max_salary,
            availability: args.available_now.then_some(Availability::Immediate),
            page: args.page,
            limit: args.limit,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct OfficeRegisterArgs {
    #[arg(long)]
    pub(crate) name: String,
    /// Trade licence number
    #[arg(long)]
    pub(crate) license: String,
    /// Emirate id, e.g. DXB
    #[arg(long)]
    pub(crate) emirate: String,
    #[arg(long)]
    pub(crate) address: Option<String>,
    #[arg(long)]
    pub(crate) phone: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) website: Option<String>,
    /// Licensed services; repeat or comma-separate
    #[arg(long = "scope", value_delimiter = ',', required = true)]
    pub(crate) scopes: Vec<String>,
}

impl From<OfficeRegisterArgs> for OfficeDraftPatch {
    fn from(args: OfficeRegisterArgs) -> Self {
        Self {
            name: Some(args.name),
            license_number: Some(args.license),
            emirate: Some(args.emirate),
            address: args.address,
            phone: Some(args.phone),
            email: Some(args.email),
            website: args.website,
            scopes: Some(args.scopes),
            logo_url: None,
        }
    }
}

fn require_session(context: &Context) -> Result<(), AppError> {
    if context.session.is_authenticated() {
        Ok(())
    } else {
        Err(AppError::Usage(
            "not signed in; run `khadamat login` first".to_string(),
        ))
    }
}

fn pretty_json<T>(value: &T) -> Result<String, AppError>
where
    T: Serialize + ?Sized,
{
    Ok(serde_json::to_string_pretty(value)?)
}

/// Maps API failures to what the user should read.
fn api_failure(locale: Locale, err: ApiError) -> AppError {
    if err.is_unauthorized() {
        return AppError::Usage(i18n::text(locale, Message::SessionExpired).to_string());
    }
    AppError::Usage(err.user_message(locale))
}

pub(crate) async fn login(context: &Context, args: LoginArgs) -> Result<(), AppError> {
    let credentials = Credentials {
        email: args.email,
        password: args.password,
    };
    let user = api::auth::sign_in(&context.client, context.session.as_ref(), &credentials).await?;
    info!(user_id = %user.id.0, "signed in");
    println!("Signed in as {} ({})", user.full_name, user.role.label());
    Ok(())
}

pub(crate) async fn admin_login(context: &Context, args: LoginArgs) -> Result<(), AppError> {
    let credentials = Credentials {
        email: args.email,
        password: args.password,
    };
    let user = api::auth::admin_sign_in(
        &context.client,
        context.session.as_ref(),
        &credentials,
        context.config.locale,
    )
    .await?;
    println!("Admin session opened for {}", user.email);

    let stats = api::admin::stats(&context.client)
        .await
        .map_err(|err| api_failure(context.config.locale, err))?;
    println!("{}", pretty_json(&stats)?);
    Ok(())
}

pub(crate) fn logout(context: &Context) -> Result<(), AppError> {
    context.session.logout()?;
    println!("Signed out");
    Ok(())
}

pub(crate) async fn whoami(context: &Context) -> Result<(), AppError> {
    require_session(context)?;
    let user = match api::auth::me(&context.client).await {
        Ok(user) => {
            context.session.update_user(user.clone())?;
            user
        }
        Err(err) if err.is_unauthorized() && context.session.refresh_token().is_some() => {
            api::auth::refresh_session(
                &context.client,
                context.session.as_ref(),
                context.config.locale,
            )
            .await?;
            api::auth::me(&context.client)
                .await
                .map_err(|err| api_failure(context.config.locale, err))?
        }
        Err(err) => return Err(api_failure(context.config.locale, err)),
    };

    println!("{} <{}>", user.full_name, user.email);
    println!("role: {}", user.role.label());
    if let Some(office_id) = &user.office_id {
        println!("office: {office_id}");
    }
    Ok(())
}

fn render_maid_row(maid: &MaidSummary, locale: Locale) -> String {
    let nationality = khadamat::lookup::find_nationality(&maid.nationality)
        .map(|entry| entry.name(locale))
        .unwrap_or(maid.nationality.as_str());
    let emirate = maid
        .emirate
        .as_deref()
        .and_then(khadamat::lookup::find_emirate)
        .map(|entry| entry.name(locale))
        .unwrap_or("-");
    let mut flags = Vec::new();
    if !maid.is_available {
        flags.push("unavailable");
    }
    if maid.is_unlocked {
        flags.push("unlocked");
    }

    format!(
        "{:<12} {:<22} {:<12} age {:>2}  {:>2}y exp  AED {:>5}/month  {}{}",
        maid.id,
        maid.name,
        nationality,
        maid.age,
        maid.experience_years,
        maid.monthly_salary,
        emirate,
        if flags.is_empty() {
            String::new()
        } else {
            format!("  [{}]", flags.join(", "))
        }
    )
}

pub(crate) async fn list_maids(context: &Context, args: MaidListArgs) -> Result<(), AppError> {
    let filters = MaidFilters::from(args);
    let page = api::maids::list(&context.client, &filters)
        .await
        .map_err(|err| api_failure(context.config.locale, err))?;

    println!(
        "{} worker(s), page {} (showing {})",
        page.total,
        page.page,
        page.items.len()
    );
    for maid in &page.items {
        println!("{}", render_maid_row(maid, context.config.locale));
    }
    Ok(())
}

pub(crate) async fn show_maid(context: &Context, id: &str) -> Result<(), AppError> {
    let profile = api::maids::get(&context.client, &MaidId::new(id))
        .await
        .map_err(|err| api_failure(context.config.locale, err))?;
    println!("{}", pretty_json(&profile)?);
    Ok(())
}

pub(crate) async fn list_favorites(context: &Context) -> Result<(), AppError> {
    require_session(context)?;
    let favorites = api::favorites::list(&context.client)
        .await
        .map_err(|err| api_failure(context.config.locale, err))?;
    if favorites.is_empty() {
        println!("No shortlisted workers");
    }
    for maid in &favorites {
        println!("{}", render_maid_row(maid, context.config.locale));
    }
    Ok(())
}

pub(crate) async fn toggle_favorite(context: &Context, id: &str) -> Result<(), AppError> {
    require_session(context)?;
    let locale = context.config.locale;
    let current = api::favorites::list(&context.client)
        .await
        .map_err(|err| api_failure(locale, err))?;

    let reconciler = FavoritesReconciler::new(Arc::new(context.client.clone()));
    reconciler.sync(current.into_iter().map(|maid| maid.id));

    let id = MaidId::new(id);
    match reconciler.toggle(&id).await {
        Ok(true) => println!("{}", i18n::text(locale, Message::FavoriteAdded)),
        Ok(false) => println!("{}", i18n::text(locale, Message::FavoriteRemoved)),
        Err(err) => {
            eprintln!("{}", i18n::text(locale, Message::FavoriteFailed));
            return Err(api_failure(locale, err));
        }
    }
    Ok(())
}

pub(crate) async fn request_quotation(
    context: &Context,
    maid: &str,
    note: Option<&str>,
) -> Result<(), AppError> {
    require_session(context)?;
    let quotation = api::quotations::request(&context.client, &MaidId::new(maid), note)
        .await
        .map_err(|err| api_failure(context.config.locale, err))?;
    println!(
        "{} ({})",
        i18n::text(context.config.locale, Message::QuotationSent),
        quotation.id.0
    );
    Ok(())
}

fn render_quotation(quotation: &Quotation) -> String {
    let terms = quotation
        .response
        .as_ref()
        .map(|response| {
            format!(
                "  AED {}/month + AED {} recruitment",
                response.monthly_fee, response.recruitment_fee
            )
        })
        .unwrap_or_default();
    format!(
        "{:<12} maid {:<12} {:<10} {}{}",
        quotation.id.0,
        quotation.maid_id,
        quotation.status.label(),
        quotation.created_at.format("%Y-%m-%d"),
        terms
    )
}

pub(crate) async fn list_quotations(context: &Context) -> Result<(), AppError> {
    require_session(context)?;
    let is_office = context
        .session
        .user()
        .is_some_and(|user| user.role == UserRole::Office);
    let quotations = if is_office {
        api::quotations::for_office(&context.client).await
    } else {
        api::quotations::mine(&context.client).await
    }
    .map_err(|err| api_failure(context.config.locale, err))?;

    if quotations.is_empty() {
        println!("No quotations yet");
    }
    for quotation in &quotations {
        println!("{}", render_quotation(quotation));
    }
    Ok(())
}

pub(crate) async fn unlock(context: &Context, args: UnlockArgs) -> Result<(), AppError> {
    require_session(context)?;
    let locale = context.config.locale;
    let maid_id = MaidId::new(args.maid);
    let client: &ApiClient = &context.client;

    let intent = api::payments::create_unlock(client, &maid_id, args.method)
        .await
        .map_err(|err| api_failure(locale, err))?;
    println!(
        "Checkout {} opened: {} {}",
        intent.payment_id, intent.currency, intent.amount
    );
    if let Some(url) = &intent.checkout_url {
        println!("Complete payment at {url}");
    }

    let Some(transaction) = args.transaction else {
        return Ok(());
    };
    let confirmation = api::payments::confirm(client, &intent.payment_id, &transaction)
        .await
        .map_err(|err| api_failure(locale, err))?;
    println!(
        "{} ({:?})",
        i18n::text(locale, Message::PaymentConfirmed),
        confirmation.status
    );

    let contact = api::maids::contact(client, &maid_id)
        .await
        .map_err(|err| api_failure(locale, err))?;
    println!("phone: {}", contact.phone);
    if let Some(whatsapp) = &contact.whatsapp {
        println!("whatsapp: {whatsapp}");
    }
    println!("office: {}", contact.office_phone);
    Ok(())
}

pub(crate) async fn register_office(
    context: &Context,
    args: OfficeRegisterArgs,
) -> Result<(), AppError> {
    require_session(context)?;
    let mut wizard = OfficeWizard::new();
    wizard.update_form_data(args.into());

    let draft = match wizard.submission() {
        Ok(draft) => draft,
        Err(errors) => {
            for (field, message) in &errors {
                eprintln!("{field}: {message}");
            }
            return Err(AppError::Usage(format!(
                "office details are incomplete (step {} of {})",
                wizard.current_step(),
                wizard.total_steps()
            )));
        }
    };

    let office = api::offices::register(&context.client, &draft)
        .await
        .map_err(|err| api_failure(context.config.locale, err))?;
    println!(
        "Office {} submitted for review ({})",
        office.name,
        office.status.as_str()
    );
    Ok(())
}

pub(crate) async fn search_places(context: &Context, query: &str) -> Result<(), AppError> {
    let provider = HttpPlaceProvider::new(&context.config.geocoder, context.config.locale)?;
    let controller = SearchController::new(Arc::new(provider), context.config.locale)
        .with_debounce(Duration::ZERO);

    let outcome = controller.search(query).await;
    let state = controller.snapshot();
    match outcome {
        Outcome::Cleared => println!("Type at least two characters"),
        Outcome::Failed => {
            return Err(AppError::Usage(state.error.unwrap_or_default()));
        }
        _ => {
            if state.results.is_empty() {
                println!("No places found for '{}'", state.query);
            }
            for place in &state.results {
                println!(
                    "{:>9.4},{:<9.4} {:<4} {}",
                    place.coordinates.latitude,
                    place.coordinates.longitude,
                    place.emirate.as_deref().unwrap_or("-"),
                    place.label
                );
            }
        }
    }
    Ok(())
}

pub(crate) async fn reverse_geocode(context: &Context, at: Coordinates) -> Result<(), AppError> {
    let provider = HttpPlaceProvider::new(&context.config.geocoder, context.config.locale)?;
    let geocoder = ReverseGeocoder::new(Arc::new(provider), context.config.locale)
        .with_debounce(Duration::ZERO);

    if geocoder.resolve(at).await == Outcome::Failed {
        return Err(AppError::Usage(geocoder.snapshot().error.unwrap_or_default()));
    }
    match geocoder.snapshot().place {
        Some(place) => println!("{}", place.label),
        None => println!("No address known at {},{}", at.latitude, at.longitude),
    }
    Ok(())
}

pub(crate) fn print_lookup(table: LookupTable, locale: Locale) {
    for entry in table.entries() {
        println!("{:<14} {}", entry.id, entry.name(locale));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use khadamat::models::{OfficeId, QuotationId, QuotationResponse, QuotationStatus};

    #[test]
    fn unrenderable_output_is_an_error() {
        let mut by_pair = std::collections::HashMap::new();
        by_pair.insert((1u8, 2u8), "tuple keys are not JSON object keys");
        assert!(matches!(pretty_json(&by_pair), Err(AppError::Output(_))));

        let rendered = pretty_json(&serde_json::json!({ "maids": 3 })).expect("renders");
        assert!(rendered.contains("\"maids\": 3"));
    }

    #[test]
    fn list_args_become_filters() {
        let filters = MaidFilters::from(MaidListArgs {
            nationality: Some("PH".to_string()),
            languages: vec!["en".to_string(), "ar".to_string()],
            available_now: true,
            ..MaidListArgs::default()
        });
        assert_eq!(filters.availability, Some(Availability::Immediate));
        assert_eq!(filters.languages.len(), 2);
        assert_eq!(filters.emirate, None);
    }

    #[test]
    fn maid_rows_use_localized_names() {
        let maid = MaidSummary {
            id: MaidId::new("m-1"),
            name: "Maria Santos".to_string(),
            nationality: "PH".to_string(),
            age: 31,
            experience_years: 6,
            monthly_salary: 2200,
            emirate: Some("DXB".to_string()),
            photo_url: None,
            languages: Vec::new(),
            office_id: "o-1".to_string(),
            office_name: None,
            is_available: false,
            is_unlocked: true,
        };
        let row = render_maid_row(&maid, Locale::En);
        assert!(row.contains("Dubai"));
        assert!(row.contains("AED  2200/month"));
        assert!(row.ends_with("[unavailable, unlocked]"));
    }

    #[test]
    fn quotation_rows_show_terms_once_answered() {
        let quotation = Quotation {
            id: QuotationId("q-1".to_string()),
            maid_id: MaidId::new("m-1"),
            office_id: OfficeId("o-1".to_string()),
            customer_id: "c-1".to_string(),
            status: QuotationStatus::Responded,
            note: None,
            response: Some(QuotationResponse {
                monthly_fee: 3000,
                recruitment_fee: 7500,
                message: None,
            }),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().expect("date"),
        };
        let row = render_quotation(&quotation);
        assert!(row.contains("2026-03-01"));
        assert!(row.ends_with("AED 3000/month + AED 7500 recruitment"));
    }
}
