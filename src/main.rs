use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use std::io;
use std::path::{Path, PathBuf};
use tavola::application::cart::{CartController, CartOutcome};
use tavola::application::checkout::{CheckoutFlow, SubmitOutcome, VerifyOutcome};
use tavola::application::reservation::{ReservationForm, ReservationOutcome};
use tavola::config::ClientConfig;
use tavola::domain::cart::QuantityAction;
use tavola::domain::order::{OrderDraft, PaymentMethod};
use tavola::domain::phone::mask_phone;
use tavola::domain::reservation::ReservationDraft;
use tavola::domain::review::{media_type_for, select_photo};
use tavola::infrastructure::http::HttpBackend;
use tavola::interfaces::terminal::TerminalView;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site root, e.g. http://127.0.0.1:8000
    #[arg(long, env = "TAVOLA_BASE_URL")]
    base_url: Option<String>,

    /// Anti-forgery token. Fetched from the cart page when omitted.
    #[arg(long, env = "TAVOLA_CSRF_TOKEN", hide_env_values = true)]
    csrf_token: Option<String>,

    /// Existing session to join (the `sessionid` cookie holding the cart)
    #[arg(long, env = "TAVOLA_SESSION_ID", hide_env_values = true)]
    session_id: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Place the order in the session's cart and confirm it with the SMS code
    Checkout(CheckoutArgs),
    /// Inspect or change the session's cart
    #[command(subcommand)]
    Cart(CartCommand),
    /// Book a table
    Reserve(ReserveArgs),
    /// Check a local photo against the review form's upload rules
    Photo { path: PathBuf },
}

#[derive(Args)]
struct CheckoutArgs {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    address: String,

    /// cash or card
    #[arg(long, default_value = "cash")]
    payment: PaymentMethod,

    /// Accept the Terms and Privacy Policy
    #[arg(long)]
    agree: bool,
}

#[derive(Args)]
struct ReserveArgs {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    email: String,

    #[arg(long, default_value = "")]
    phone: String,

    /// Party size: 1-6, or 8 for more than six
    #[arg(long)]
    guests: Option<u8>,

    /// Visit date, YYYY-MM-DD
    #[arg(long, default_value = "")]
    date: String,

    /// Visit time, HH:MM
    #[arg(long, default_value = "")]
    time: String,

    /// Special request for the restaurant
    #[arg(long = "request", default_value = "")]
    special_request: String,

    /// reCAPTCHA response token
    #[arg(long)]
    captcha: Option<String>,
}

#[derive(Subcommand)]
enum CartCommand {
    /// Show subtotal, discount, delivery and total
    Totals,
    /// Increase or decrease a dish's quantity by one
    Quantity {
        dish_id: String,
        /// increase or decrease
        action: QuantityAction,
        /// Quantity currently in the cart
        #[arg(long)]
        current: u32,
    },
    /// Remove a dish from the cart
    Remove { dish_id: String },
    /// Apply a coupon code
    Coupon { code: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    if let Command::Photo { path } = &cli.command {
        return photo(path);
    }

    let config = match &cli.config {
        Some(path) => ClientConfig::from_file(path).into_diagnostic()?,
        None => ClientConfig::default(),
    }
    .with_overrides(cli.base_url, cli.csrf_token, cli.session_id)
    .into_diagnostic()?;
    tracing::debug!(?config, "configuration loaded");

    let backend = HttpBackend::new(config).into_diagnostic()?;

    match cli.command {
        Command::Checkout(args) => checkout(backend, args).await,
        Command::Cart(command) => cart(backend, command).await,
        Command::Reserve(args) => reserve(backend, args).await,
        Command::Photo { path } => photo(&path),
    }
}

async fn checkout(backend: HttpBackend, args: CheckoutArgs) -> Result<()> {
    let draft = OrderDraft {
        customer_name: args.name,
        phone_number: if args.phone.trim().is_empty() {
            args.phone
        } else {
            mask_phone(&args.phone)
        },
        delivery_address: args.address,
        payment_method: args.payment,
        agree: args.agree,
    };

    let mut flow = CheckoutFlow::new(Box::new(backend), TerminalView::new(io::stdout()));

    match flow.submit_order(&draft).await.into_diagnostic()? {
        SubmitOutcome::AwaitingCode => {}
        SubmitOutcome::Invalid(check) => {
            if !check.agreed {
                return Err(miette!("Please agree to the Terms and Privacy Policy"));
            }
            return Err(miette!("Please fill in all required fields"));
        }
        SubmitOutcome::Rejected(message) => return Err(miette!("Order rejected: {message}")),
        SubmitOutcome::TransportFailed => {
            return Err(miette!("Could not reach the server. Please try again."));
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.into_diagnostic()? {
        match flow.submit_code(&line).await.into_diagnostic()? {
            VerifyOutcome::Confirmed => return Ok(()),
            VerifyOutcome::InvalidFormat
            | VerifyOutcome::Rejected(_)
            | VerifyOutcome::TransportFailed => flow.view_mut().prompt_code(),
        }
    }

    Err(miette!("Input ended before the order was confirmed"))
}

async fn cart(backend: HttpBackend, command: CartCommand) -> Result<()> {
    let mut cart = CartController::new(Box::new(backend), TerminalView::new(io::stdout()));

    let outcome = match command {
        CartCommand::Totals => cart.refresh_totals().await,
        CartCommand::Quantity {
            dish_id,
            action,
            current,
        } => cart.change_quantity(&dish_id, current, action).await,
        CartCommand::Remove { dish_id } => {
            cart.request_remove(&dish_id);
            cart.confirm_remove().await
        }
        CartCommand::Coupon { code } => cart.apply_coupon(&code).await,
    }
    .into_diagnostic()?;

    match outcome {
        CartOutcome::Applied => Ok(()),
        CartOutcome::Rejected(message) => Err(miette!(
            "{}",
            message.unwrap_or_else(|| "Request rejected".to_string())
        )),
        CartOutcome::TransportFailed => Err(miette!("Could not reach the server. Please try again.")),
        CartOutcome::NothingPending => Ok(()),
    }
}

async fn reserve(backend: HttpBackend, args: ReserveArgs) -> Result<()> {
    let draft = ReservationDraft {
        name: args.name,
        email: args.email,
        phone: args.phone,
        guests: args.guests,
        visit_date: args.date,
        visit_time: args.time,
        special_request: args.special_request,
        captcha: args.captcha,
    };

    let mut form = ReservationForm::new(Box::new(backend), TerminalView::new(io::stdout()));

    match form.submit(&draft).await.into_diagnostic()? {
        ReservationOutcome::Accepted(_) => Ok(()),
        ReservationOutcome::Invalid(_) => Err(miette!("Please fill in all required fields")),
        ReservationOutcome::Rejected(_) => Err(miette!("Reservation rejected")),
        ReservationOutcome::TransportFailed => {
            Err(miette!("Could not reach the server. Please try again."))
        }
    }
}

fn photo(path: &Path) -> Result<()> {
    let size = std::fs::metadata(path).into_diagnostic()?.len();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let selected = select_photo(&file_name, media_type_for(path), size).into_diagnostic()?;
    println!("{} ({})", selected.display_name, selected.size_label);
    Ok(())
}
