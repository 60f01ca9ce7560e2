use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::database::models::Product;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".into(), json!(true));
            response.insert("message".into(), json!(message));

            match data {
                Some(Value::Object(fields)) => response.extend(fields),
                Some(other) => {
                    response.insert("data".into(), other);
                }
                None => {}
            }

            println!("{}", serde_json::to_string_pretty(&Value::Object(response))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str, error_code: Option<&str>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output a product list as a JSON array or one line per product
pub fn output_products(output_format: &OutputFormat, products: &[Product]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(products)?);
        }
        OutputFormat::Text if products.is_empty() => {
            println!("No products");
        }
        OutputFormat::Text => {
            for product in products {
                println!("{}", product_line(product));
            }
        }
    }
    Ok(())
}

pub fn output_product(output_format: &OutputFormat, message: &str, product: &Product) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_success(output_format, message, Some(json!({ "product": product }))),
        OutputFormat::Text => {
            println!("✓ {}", message);
            println!("{}", product_line(product));
            Ok(())
        }
    }
}

pub fn product_line(product: &Product) -> String {
    match &product.description {
        Some(description) => format!("{}  {}  {:.2}  {}", product.id, product.name, product.price, description),
        None => format!("{}  {}  {:.2}", product.id, product.name, product.price),
    }
}
