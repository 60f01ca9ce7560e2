use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::cli::config::{load_session, save_session, CliSession};
use crate::cli::utils::{output_product, output_products, output_success};
use crate::cli::OutputFormat;
use crate::client::Session;
use crate::database::models::{NewProduct, Price, ProductPatch};
use crate::types::Field;

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List your products")]
    List,

    #[command(about = "Create a product")]
    Create {
        #[arg(long, help = "Product name")]
        name: String,
        #[arg(long, help = "Price", allow_negative_numbers = true)]
        price: f64,
        #[arg(long, help = "Optional description")]
        description: Option<String>,
    },

    #[command(about = "Change fields of a product you own")]
    Update {
        #[arg(help = "Product id")]
        id: Uuid,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New price", allow_negative_numbers = true)]
        price: Option<f64>,
        #[arg(long, help = "New description", conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long, help = "Remove the description")]
        clear_description: bool,
    },

    #[command(about = "Delete a product you own")]
    Delete {
        #[arg(help = "Product id")]
        id: Uuid,
    },
}

pub async fn handle(cmd: ProductCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut stored = load_session()?;
    let mut session = stored.session();
    if !session.is_authenticated() {
        anyhow::bail!("not logged in: run `shelf auth login <email>` first");
    }

    let result = execute(cmd, &mut session, &output_format).await;
    forget_rejected_token(&mut stored, &session)?;
    result
}

async fn execute(cmd: ProductCommands, session: &mut Session, output_format: &OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProductCommands::List => {
            let products = session.load().await?;
            output_products(output_format, products)
        }
        ProductCommands::Create { name, price, description } => {
            let input = NewProduct {
                name: Some(name),
                description,
                price: Some(Price(price)),
            };
            let product = session.create(&input).await?;
            output_product(output_format, "Product created", &product)
        }
        ProductCommands::Update {
            id,
            name,
            price,
            description,
            clear_description,
        } => {
            let patch = build_patch(name, price, description, clear_description);
            if patch.is_empty() {
                anyhow::bail!("nothing to update: pass --name, --price, --description or --clear-description");
            }
            let product = session.update(id, &patch).await?;
            output_product(output_format, "Product updated", &product)
        }
        ProductCommands::Delete { id } => {
            let message = session.delete(id).await?;
            output_success(output_format, &message, Some(json!({ "id": id })))
        }
    }
}

/// Flags left off the command line stay out of the request body
pub fn build_patch(name: Option<String>, price: Option<f64>, description: Option<String>, clear_description: bool) -> ProductPatch {
    ProductPatch {
        name: Field::or_absent(name),
        price: Field::or_absent(price.map(Price)),
        description: if clear_description {
            Field::Null
        } else {
            Field::or_absent(description)
        },
    }
}

/// Persist the logout when the server refused the stored token
fn forget_rejected_token(stored: &mut CliSession, session: &Session) -> anyhow::Result<()> {
    if stored.token.is_some() && !session.is_authenticated() {
        stored.clear_login();
        save_session(stored)?;
    }
    Ok(())
}
