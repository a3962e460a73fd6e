use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use kirada::api::ActionOutcome;
use kirada::lifecycle::{ApplicationAction, PropertyTransition};
use kirada::models::{PropertyDraft, PropertyFilter, PropertyType, Registration, Role};
use kirada::routes::{Access, Route};
use kirada::upload::ImageFile;
use kirada::views::{self, ApplicationForm, DashboardPage, Listings, Loadable, OwnerTab, PropertyDetail, PropertyForm, View};
use kirada::{ApiClient, Config, FileTokenStore, Session};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kirada", about = "Evim Kirada rental marketplace client")]
struct Cli {
    /// Backend origin, e.g. https://api.evimkirada.com
    #[arg(long, env = "KIRADA_BACKEND_URL")]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the backend is reachable
    Health,
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "KIRADA_PASSWORD")]
        password: String,
    },
    Register(RegisterArgs),
    Logout,
    Whoami,
    /// Browse active listings
    Browse(BrowseArgs),
    /// Show a single listing
    Show { id: String },
    /// Apply to a listing as a tenant
    Apply {
        property_id: String,
        #[arg(long)]
        message: String,
        /// Move-in date, YYYY-MM-DD
        #[arg(long)]
        move_in: NaiveDate,
        #[arg(long)]
        rent: Option<f64>,
    },
    /// Role dashboard for the signed-in user
    Dashboard {
        /// Owner tab: overview, properties, applications or payments
        #[arg(long, default_value = "overview")]
        tab: OwnerTab,
    },
    /// Publish, suspend or resume one of your listings
    Property { transition: PropertyTransition, id: String },
    /// Act on an application
    Application {
        action: ApplicationCommand,
        id: String,
        /// Note or rejection reason sent with the status change
        #[arg(long)]
        note: Option<String>,
    },
    /// Create a listing, optionally with photos
    NewProperty(NewPropertyArgs),
    /// Start payment for an approved booking
    Pay { booking_id: String },
    /// Open a page by path, e.g. /dashboard or /properties/<id>
    Open { path: String },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "KIRADA_PASSWORD")]
    password: String,
    #[arg(long)]
    name: String,
    /// tenant or owner
    #[arg(long, default_value = "tenant")]
    role: Role,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Args, Debug, Default)]
struct BrowseArgs {
    #[arg(long)]
    city: Option<String>,
    #[arg(long)]
    district: Option<String>,
    #[arg(long = "type")]
    property_type: Option<PropertyType>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    /// Room layout such as 2+1
    #[arg(long)]
    rooms: Option<String>,
    #[arg(long)]
    furnished: Option<bool>,
    #[arg(long)]
    skip: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

impl From<BrowseArgs> for PropertyFilter {
    fn from(args: BrowseArgs) -> Self {
        PropertyFilter {
            city: args.city,
            district: args.district,
            property_type: args.property_type,
            min_price: args.min_price,
            max_price: args.max_price,
            rooms: args.rooms,
            furnished: args.furnished,
            skip: args.skip,
            limit: args.limit,
        }
    }
}

#[derive(Args, Debug)]
struct NewPropertyArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long = "type", default_value = "apartment")]
    property_type: PropertyType,
    #[arg(long)]
    address: String,
    #[arg(long)]
    district: String,
    #[arg(long, default_value = "İstanbul")]
    city: String,
    /// Monthly rent
    #[arg(long)]
    price: f64,
    #[arg(long, default_value_t = 0.0)]
    deposit: f64,
    /// Size in square meters
    #[arg(long)]
    area: u32,
    #[arg(long)]
    rooms: String,
    #[arg(long)]
    floor: Option<i32>,
    #[arg(long)]
    heating: Option<String>,
    #[arg(long)]
    furnished: bool,
    #[arg(long)]
    pets_allowed: bool,
    #[arg(long = "amenity")]
    amenities: Vec<String>,
    /// Photo to upload; repeat for several
    #[arg(long = "image")]
    images: Vec<std::path::PathBuf>,
}

impl From<&NewPropertyArgs> for PropertyDraft {
    fn from(args: &NewPropertyArgs) -> Self {
        PropertyDraft {
            title: args.title.clone(),
            description: args.description.clone(),
            property_type: args.property_type.clone(),
            address: args.address.clone(),
            district: args.district.clone(),
            city: args.city.clone(),
            price: args.price,
            deposit: args.deposit,
            area: args.area,
            rooms: args.rooms.clone(),
            floor: args.floor,
            heating: args.heating.clone(),
            furnished: args.furnished,
            pets_allowed: args.pets_allowed,
            amenities: args.amenities.clone(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ApplicationCommand {
    Approve,
    Reject,
    Review,
    Kyc,
}

impl From<ApplicationCommand> for ApplicationAction {
    fn from(command: ApplicationCommand) -> Self {
        match command {
            ApplicationCommand::Approve => ApplicationAction::Approve,
            ApplicationCommand::Reject => ApplicationAction::Reject,
            ApplicationCommand::Review => ApplicationAction::MarkUnderReview,
            ApplicationCommand::Kyc => ApplicationAction::RunKyc,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Loads .env before clap reads the environment
    let mut config = Config::from_env();
    let cli = Cli::parse();
    if let Some(url) = &cli.backend_url {
        config = config.with_backend_url(url);
    }
    debug!("Backend: {}", config.api_url("/"));

    let api = ApiClient::new(config.clone()).context("Failed to create HTTP client")?;
    let mut session = Session::restore(FileTokenStore::new(config.token_path.clone()), &api).await;

    run(cli.command, &api, &mut session).await
}

async fn run(command: Command, api: &ApiClient, session: &mut Session) -> Result<()> {
    let config = api.config();

    match command {
        Command::Health => {
            let health = api.health().await.context("Backend is not reachable")?;
            println!("Backend {}: {}", config.backend_url, health.status);
        }
        Command::Login { email, password } => {
            let user = session.login(api, &email, &password).await.context("Sign-in failed")?;
            println!("Signed in as {} ({})", user.full_name, user.role);
        }
        Command::Register(args) => {
            let registration = Registration {
                email: args.email,
                password: args.password,
                full_name: args.name,
                role: args.role,
                phone: args.phone,
            };
            let user = session.register(api, &registration).await.context("Registration failed")?;
            println!("Welcome, {}! Signed in as {}.", user.full_name, user.role);
        }
        Command::Logout => {
            session.logout();
            println!("Signed out");
        }
        Command::Whoami => match session.user() {
            Some(user) => {
                println!("{} <{}>", user.full_name, user.email);
                println!("Role: {}", user.role);
                if user.profile.is_kyc_verified {
                    println!("KYC verified");
                }
            }
            None => println!("Not signed in"),
        },
        Command::Browse(args) => {
            let view = Listings::new(args.into());
            load_and_show(&view, api, session, "Could not load listings").await?;
        }
        Command::Show { id } => {
            let view = PropertyDetail::new(id);
            load_and_show(&view, api, session, "Could not load the listing").await?;
        }
        Command::Apply { property_id, message, move_in, rent } => {
            let mut form = ApplicationForm::new(property_id);
            form.message = message;
            form.move_in = Some(move_in);
            form.proposed_rent = rent;
            form.submit(api, session).await.context("Application was not sent")?;
            print!("{}", form.render());
        }
        Command::Dashboard { tab } => {
            let mut page = DashboardPage::for_session(session)?.with_owner_tab(tab);
            page.refresh(api, session).await.context("Could not load the dashboard")?;
            print!("{}", page.render(session, config));
        }
        Command::Property { transition, id } => {
            let mut page = DashboardPage::for_session(session)?.with_owner_tab(OwnerTab::Properties);
            page.refresh(api, session).await.context("Could not load your listings")?;
            let status = page
                .transition_property(api, session, &id, transition)
                .await
                .with_context(|| format!("Could not {transition} listing {id}"))?;
            info!("Listing {} is now {}", id, status);
            print!("{}", page.render(session, config));
        }
        Command::Application { action, id, note } => {
            let action = ApplicationAction::from(action);
            let mut page = DashboardPage::for_session(session)?.with_owner_tab(OwnerTab::Applications);
            page.refresh(api, session).await.context("Could not load applications")?;
            let outcome = page
                .act_on_application(api, session, &id, action, note.as_deref())
                .await
                .with_context(|| format!("Could not {action} application {id}"))?;
            match outcome {
                ActionOutcome::StatusUpdated(status) => println!("Application {id} is now {status}"),
                ActionOutcome::Kyc(kyc) => {
                    if let Some(score) = kyc.score {
                        println!("KYC score: {score}/100");
                    }
                    if let Some(notes) = kyc.notes {
                        println!("KYC notes: {notes}");
                    }
                }
            }
            print!("{}", page.render(session, config));
        }
        Command::NewProperty(args) => {
            let mut form = PropertyForm::new(PropertyDraft::from(&args), config);
            form.validate()?;

            let mut files = Vec::with_capacity(args.images.len());
            for path in &args.images {
                let image = ImageFile::read(path, config.max_image_bytes)
                    .await
                    .with_context(|| format!("Could not read {}", path.display()))?;
                files.push(image);
            }
            form.attach(api, session, &files).await.context("Photos were not uploaded")?;
            print!("{}", form.render(config));

            let property = form.submit(api, session).await.context("Listing was not created")?;
            let view = PropertyDetail::new(property.id.clone());
            print!("{}", view.render(&property, session, config));
            println!("Saved as draft. Publish with: kirada property publish {}", property.id);
        }
        Command::Pay { booking_id } => {
            let init = api
                .payments()
                .initialize(session, &booking_id)
                .await
                .context("Payment could not be started")?;
            println!("Payment {}", init.status);
            println!("Total: {}", views::render::money(init.total_amount));
            if let Some(breakdown) = &init.commission_breakdown {
                println!("Platform commission: {}", views::render::money(breakdown.platform_commission));
                println!("Owner receives: {}", views::render::money(breakdown.owner_amount));
                println!(
                    "Rate: {}",
                    breakdown.commission_rate.as_deref().unwrap_or(kirada::models::DEFAULT_COMMISSION_RATE)
                );
            }
            if let Some(url) = &init.payment_url {
                println!("Continue at: {url}");
            }
        }
        Command::Open { path } => open(&path, api, session).await?,
    }

    Ok(())
}

async fn load_and_show<V: View>(view: &V, api: &ApiClient, session: &mut Session, failure: &'static str) -> Result<()> {
    let mut state = Loadable::default();
    views::refresh(view, &mut state, api, session).await.context(failure)?;
    print!("{}", views::show(view, &state, session, api.config()));
    Ok(())
}

/// Navigate by path, honouring the role gate
async fn open(path: &str, api: &ApiClient, session: &mut Session) -> Result<()> {
    let route = Route::parse(path);

    match route.access(session.role()) {
        Access::LoginRequired => {
            println!("Sign in to view {route}: kirada login --email <email>");
            return Ok(());
        }
        Access::Denied => {
            println!("Access denied: your account cannot open {route}");
            return Ok(());
        }
        Access::Allowed => {}
    }

    match route {
        Route::Home | Route::Properties => {
            load_and_show(&Listings::default(), api, session, "Could not load listings").await
        }
        Route::PropertyDetail(id) => {
            load_and_show(&PropertyDetail::new(id), api, session, "Could not load the listing").await
        }
        Route::Dashboard | Route::Admin => {
            let mut page = DashboardPage::for_session(session)?;
            page.refresh(api, session).await.context("Could not load the dashboard")?;
            print!("{}", page.render(session, api.config()));
            Ok(())
        }
        Route::NewProperty => {
            println!("Create a listing with: kirada new-property --title ... --price ... [--image <file>]");
            Ok(())
        }
        Route::Login => {
            println!("kirada login --email <email>");
            Ok(())
        }
        Route::Register => {
            println!("kirada register --email <email> --name <full name> --role tenant|owner");
            Ok(())
        }
        Route::NotFound(path) => {
            println!("Page not found: {path}");
            Ok(())
        }
    }
}
