use crate::commands;
use crate::infra::{self, parse_coordinates, parse_lookup_table, parse_payment_method};
use clap::{Args, Parser, Subcommand};
use khadamat::error::AppError;
use khadamat::lookup::LookupTable;
use khadamat::models::{Coordinates, PaymentMethod};

#[derive(Parser, Debug)]
#[command(
    name = "khadamat",
    about = "Browse, shortlist and unlock domestic-worker profiles from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the session
    Login(LoginArgs),
    /// Sign in to the admin dashboard (super admins only)
    AdminLogin(LoginArgs),
    /// Clear the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse worker profiles
    Maids {
        #[command(subcommand)]
        command: MaidsCommand,
    },
    /// Manage the shortlist
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
    /// Request or review service quotations
    Quotations {
        #[command(subcommand)]
        command: QuotationsCommand,
    },
    /// Pay to unlock a worker's contact details
    Unlock(UnlockArgs),
    /// Register a recruitment office
    Office {
        #[command(subcommand)]
        command: OfficeCommand,
    },
    /// Print a reference table
    Lookup {
        #[arg(value_parser = parse_lookup_table)]
        table: LookupTable,
    },
    /// Search UAE places
    Places {
        /// Free-text query, at least two characters
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Resolve a `lat,lon` pair to an address
    Geocode {
        #[arg(value_parser = parse_coordinates, allow_hyphen_values = true)]
        at: Coordinates,
    },
}

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long)]
    pub(crate) password: String,
}

#[derive(Subcommand, Debug)]
enum MaidsCommand {
    /// List profiles matching the filters
    List(commands::MaidListArgs),
    /// Show one profile
    Show { id: String },
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    /// List shortlisted workers
    List,
    /// Add or remove a worker from the shortlist
    Toggle { id: String },
}

#[derive(Subcommand, Debug)]
enum QuotationsCommand {
    /// Ask a worker's office for terms
    Request {
        maid: String,
        /// Message for the office
        #[arg(long)]
        note: Option<String>,
    },
    /// List quotations for the signed-in account
    List,
}

#[derive(Subcommand, Debug)]
enum OfficeCommand {
    /// Validate and submit an office registration
    Register(commands::OfficeRegisterArgs),
}

#[derive(Args, Debug)]
pub(crate) struct UnlockArgs {
    pub(crate) maid: String,
    /// `card` or `bnpl`
    #[arg(long, value_parser = parse_payment_method, default_value = "card")]
    pub(crate) method: PaymentMethod,
    /// Provider transaction id to confirm; omit to only open the checkout
    #[arg(long)]
    pub(crate) transaction: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let context = infra::bootstrap()?;

    match cli.command {
        Command::Login(args) => commands::login(&context, args).await,
        Command::AdminLogin(args) => commands::admin_login(&context, args).await,
        Command::Logout => commands::logout(&context),
        Command::Whoami => commands::whoami(&context).await,
        Command::Maids {
            command: MaidsCommand::List(args),
        } => commands::list_maids(&context, args).await,
        Command::Maids {
            command: MaidsCommand::Show { id },
        } => commands::show_maid(&context, &id).await,
        Command::Favorites {
            command: FavoritesCommand::List,
        } => commands::list_favorites(&context).await,
        Command::Favorites {
            command: FavoritesCommand::Toggle { id },
        } => commands::toggle_favorite(&context, &id).await,
        Command::Quotations {
            command: QuotationsCommand::Request { maid, note },
        } => commands::request_quotation(&context, &maid, note.as_deref()).await,
        Command::Quotations {
            command: QuotationsCommand::List,
        } => commands::list_quotations(&context).await,
        Command::Unlock(args) => commands::unlock(&context, args).await,
        Command::Office {
            command: OfficeCommand::Register(args),
        } => commands::register_office(&context, args).await,
        Command::Places { query } => commands::search_places(&context, &query.join(" ")).await,
        Command::Geocode { at } => commands::reverse_geocode(&context, at).await,
        Command::Lookup { table } => {
            commands::print_lookup(table, context.config.locale);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn unlock_defaults_to_card() {
        let cli = Cli::try_parse_from(["khadamat", "unlock", "maid-7"]).expect("parses");
        match cli.command {
            Command::Unlock(args) => {
                assert_eq!(args.method, PaymentMethod::Card);
                assert_eq!(args.transaction, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn geocode_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["khadamat", "geocode", "-1.5,10.25"]).expect("parses");
        match cli.command {
            Command::Geocode { at } => assert_eq!(at, Coordinates::new(-1.5, 10.25)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
