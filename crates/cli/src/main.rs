use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use facedeck_core::api::client::{ApiClient, ApiConfig};
use facedeck_core::capture::domain::capture_source::Snapshot;
use facedeck_core::shared::constants::DEFAULT_BASE_URL;

/// Command-line client for the face recognition backend.
#[derive(Parser)]
#[command(name = "facedeck")]
struct Cli {
    /// Backend base URL.
    #[arg(long, env = "FACEDECK_API", default_value = DEFAULT_BASE_URL)]
    api: String,

    /// Print raw JSON instead of human-readable output.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check whether the backend is up.
    Health,
    /// Detect and recognize faces in an image file.
    Analyze {
        /// Image to analyze (JPEG, PNG, BMP, TIFF or WebP).
        image: PathBuf,
    },
    /// Register a person from one or more face photos.
    Register {
        /// Name of the person.
        name: String,
        /// Face photos.
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },
    /// Manage registered users.
    #[command(subcommand)]
    Users(UsersCommand),
}

#[derive(Subcommand)]
enum UsersCommand {
    /// List registered users.
    List,
    /// Show one registered user.
    Show { name: String },
    /// Rename a user, keeping their stored face data.
    Rename { name: String, new_name: String },
    /// Delete a user and all their stored face data.
    Delete {
        name: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = ApiClient::new(&ApiConfig::with_base_url(&cli.api))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let json = cli.json;
    runtime.block_on(async {
        match cli.command {
            Command::Health => health(&client, json).await,
            Command::Analyze { image } => analyze(&client, &image, json).await,
            Command::Register { name, images } => register(&client, &name, &images, json).await,
            Command::Users(users) => match users {
                UsersCommand::List => list_users(&client, json).await,
                UsersCommand::Show { name } => show_user(&client, &name, json).await,
                UsersCommand::Rename { name, new_name } => {
                    rename_user(&client, &name, &new_name).await
                }
                UsersCommand::Delete { name, yes } => delete_user(&client, &name, yes).await,
            },
        }
    })
}

async fn health(client: &ApiClient, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let online = client.health().await;

    if json {
        println!("{}", serde_json::json!({ "online": online }));
    } else if online {
        println!("Backend is up");
    }

    if online {
        Ok(())
    } else {
        Err("backend is unreachable or unhealthy".into())
    }
}

async fn analyze(
    client: &ApiClient,
    image: &Path,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let jpeg = load_jpeg(image)?;
    let results = client.analyze(jpeg).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No faces found");
        return Ok(());
    }
    for (index, face) in results.iter().enumerate() {
        let [x1, y1, _, _] = face.bbox;
        println!(
            "{:>2}. {:<20} similarity {:>5.1}%  det {:>5.1}%  box {:.0},{:.0} {:.0}x{:.0}",
            index + 1,
            face.name,
            face.similarity * 100.0,
            face.score * 100.0,
            x1,
            y1,
            face.width(),
            face.height(),
        );
    }
    Ok(())
}

async fn register(
    client: &ApiClient,
    name: &str,
    images: &[PathBuf],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut jpegs = Vec::with_capacity(images.len());
    for path in images {
        jpegs.push(load_jpeg(path)?);
    }

    let receipt = if jpegs.len() == 1 {
        let jpeg = jpegs.remove(0);
        client.register(name, jpeg).await?
    } else {
        client.register_multiple(name, jpegs).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
        return Ok(());
    }

    if receipt.is_success() {
        match receipt.total_images {
            Some(total) => println!("Registered {name}; backend now holds {total} photo(s)"),
            None => println!("Registered {name}"),
        }
        Ok(())
    } else {
        let detail = if receipt.message.is_empty() {
            receipt.status
        } else {
            receipt.message
        };
        Err(format!("registration failed: {detail}").into())
    }
}

async fn list_users(client: &ApiClient, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let list = client.list_users().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if list.users.is_empty() {
        println!("No registered users");
        return Ok(());
    }
    for user in &list.users {
        match user.updated_date() {
            Some(date) => println!(
                "{:<24} {:>3} photos  updated {date}",
                user.name, user.image_count
            ),
            None => println!("{:<24} {:>3} photos", user.name, user.image_count),
        }
    }
    Ok(())
}

async fn show_user(
    client: &ApiClient,
    name: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let user = client.get_user(name).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("Name:    {}", user.name);
    println!("Photos:  {}", user.image_count);
    if let Some(date) = user.updated_date() {
        println!("Updated: {date}");
    }
    Ok(())
}

async fn rename_user(
    client: &ApiClient,
    name: &str,
    new_name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    client.rename_user(name, new_name).await?;
    println!("Renamed {name} to {new_name}");
    Ok(())
}

async fn delete_user(
    client: &ApiClient,
    name: &str,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !yes && !confirm(&format!("Delete {name} and all stored face data?"))? {
        println!("Aborted");
        return Ok(());
    }
    client.delete_user(name).await?;
    println!("Deleted {name}");
    Ok(())
}

/// Reads the image and re-encodes to JPEG when needed, so the backend
/// always receives what it expects.
fn load_jpeg(path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let bytes = fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let snapshot = Snapshot::from_encoded(bytes)?;
    log::debug!(
        "{}: {}x{}, {} bytes as JPEG",
        path.display(),
        snapshot.width,
        snapshot.height,
        snapshot.jpeg.len()
    );
    Ok(snapshot.jpeg)
}

fn confirm(prompt: &str) -> Result<bool, io::Error> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
