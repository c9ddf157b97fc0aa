use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{de::DeserializeOwned, Serialize};
use reqwest::Url;
use std::time::Duration;

// Import shared types
use lifesim_types::*;

#[derive(Parser)]
#[command(name = "lifesim")]
#[command(about = "Command-line client for the life simulation backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend server URL
    #[arg(long, default_value = "http://localhost:10000")]
    server: String,

    /// Timeout for requests in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Output format (json or text)
    #[arg(long, default_value = "json")]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the backend is up
    Health,

    /// Show the current scene header
    Scene,

    /// Move the scene clock forward (or back) by a number of hours
    Advance {
        #[arg(allow_negative_numbers = true)]
        hours: i64,
    },

    /// List world flags
    Flags,

    /// Set a world flag
    SetFlag { key: String, value: String },

    /// Show a player, creating it if it does not exist
    Player { player_id: String },

    /// Update fields of an existing player
    UpdatePlayer {
        player_id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        location: Option<String>,

        #[arg(long)]
        money: Option<f64>,
    },

    /// Create an NPC
    CreateNpc {
        name: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Show an NPC
    Npc { npc_id: String },

    /// Record a resolved turn for a player
    Resolve {
        player_id: String,
        summary: String,

        #[arg(long)]
        detail: Option<String>,
    },

    /// List the most recent events
    Events {
        #[arg(long, default_value_t = 50)]
        limit: u64,
    },

    /// Render the event log to PDF and print its URL
    Pdf,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    fn new(server: &str, timeout: u64) -> Result<Self> {
        let base = Url::parse(server).with_context(|| format!("Invalid server URL: {}", server))?;
        if base.cannot_be_a_base() {
            return Err(anyhow::anyhow!("Invalid server URL: {}", server));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http, base })
    }

    /// Append path segments to the server URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        send(self.http.get(url.clone()), &url).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T> {
        send(self.http.post(url.clone()).json(body), &url).await
    }

    async fn patch<B: Serialize, T: DeserializeOwned>(&self, url: Url, body: &B) -> Result<T> {
        send(self.http.patch(url.clone()).json(body), &url).await
    }
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder, url: &Url) -> Result<T> {
    let path = url.path();
    let response = request
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", path))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(anyhow::anyhow!(
            "Request to {} failed with status {}: {}",
            path,
            status,
            error_text
        ));
    }

    response
        .json()
        .await
        .with_context(|| format!("Failed to parse response from {}", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = ApiClient::new(&cli.server, cli.timeout)?;
    let output = cli.output;

    match cli.command {
        Commands::Health => {
            let body: serde_json::Value = client.get(client.endpoint(&["health"])).await?;
            print_json_or(&output, &body, || {
                println!(
                    "✅ {} is {}",
                    body["service"].as_str().unwrap_or("backend"),
                    body["status"].as_str().unwrap_or("unknown")
                )
            })?;
        }
        Commands::Scene => {
            let scene: SceneState = client.get(client.endpoint(&["api", "state", "scene"])).await?;
            print_json_or(&output, &scene, || print_scene(&scene))?;
        }
        Commands::Advance { hours } => {
            let response: AdvanceTimeResponse = client
                .post(
                    client.endpoint(&["api", "state", "advance-time"]),
                    &AdvanceTimeRequest { hours },
                )
                .await?;
            print_json_or(&output, &response, || print_scene(&response.scene))?;
        }
        Commands::Flags => {
            let response: FlagsResponse = client
                .get(client.endpoint(&["api", "state", "flags"]))
                .await?;
            print_json_or(&output, &response, || {
                if response.flags.is_empty() {
                    println!("No world flags set");
                }
                for (key, value) in &response.flags {
                    println!("🚩 {} = {}", key, value);
                }
            })?;
        }
        Commands::SetFlag { key, value } => {
            let response: SetFlagResponse = client
                .post(
                    client.endpoint(&["api", "state", "flags"]),
                    &SetFlagRequest { key, value },
                )
                .await?;
            print_json_or(&output, &response, || {
                println!("🚩 {} = {}", response.key, response.value)
            })?;
        }
        Commands::Player { player_id } => {
            let player: PlayerInfo = client
                .get(client.endpoint(&["api", "player", player_id.as_str()]))
                .await?;
            print_json_or(&output, &player, || print_player(&player))?;
        }
        Commands::UpdatePlayer {
            player_id,
            name,
            location,
            money,
        } => {
            let changes = UpdatePlayerRequest {
                name,
                location,
                money,
            };
            let player: PlayerInfo = client
                .patch(client.endpoint(&["api", "player", player_id.as_str()]), &changes)
                .await?;
            print_json_or(&output, &player, || print_player(&player))?;
        }
        Commands::CreateNpc { name, description } => {
            let npc: NpcInfo = client
                .post(
                    client.endpoint(&["api", "npc"]),
                    &CreateNpcRequest { name, description },
                )
                .await?;
            print_json_or(&output, &npc, || print_npc(&npc))?;
        }
        Commands::Npc { npc_id } => {
            let npc: NpcInfo = client
                .get(client.endpoint(&["api", "npc", npc_id.as_str()]))
                .await?;
            print_json_or(&output, &npc, || print_npc(&npc))?;
        }
        Commands::Resolve {
            player_id,
            summary,
            detail,
        } => {
            let request = ResolveTurnRequest {
                player_id,
                summary,
                detail,
            };
            let response: ResolveTurnResponse = client
                .post(client.endpoint(&["api", "turns", "resolve"]), &request)
                .await?;
            print_json_or(&output, &response, || {
                println!("🎲 Turn {}: {}", response.status, response.event_id)
            })?;
        }
        Commands::Events { limit } => {
            let mut url = client.endpoint(&["api", "logs", "events"]);
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
            let response: EventsResponse = client.get(url).await?;
            print_json_or(&output, &response, || {
                for event in &response.events {
                    println!(
                        "[{}] {} {} - {}",
                        event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        event.world_date.as_deref().unwrap_or("?"),
                        event.world_time.as_deref().unwrap_or("?"),
                        event.summary
                    );
                }
            })?;
        }
        Commands::Pdf => {
            let response: PdfLogResponse = client.get(client.endpoint(&["api", "logs", "pdf"])).await?;
            print_json_or(&output, &response, || {
                println!("📄 Event log: {}", response.pdf_url)
            })?;
        }
    }

    Ok(())
}

fn print_json_or<T: Serialize>(
    output_format: &OutputFormat,
    value: &T,
    print_text: impl FnOnce(),
) -> Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print_text(),
    }
    Ok(())
}

fn print_scene(scene: &SceneState) {
    println!("📅 {}  🕒 {}", scene.date, scene.time);
    println!("📍 {}  💰 {}", scene.location, scene.funds);
}

fn print_player(player: &PlayerInfo) {
    println!(
        "🧍 {} ({})",
        player.name.as_deref().unwrap_or("unnamed"),
        player.player_id
    );
    println!(
        "   location: {}",
        player.location.as_deref().unwrap_or("unknown")
    );
    println!("   money: {:.2}", player.money);
}

fn print_npc(npc: &NpcInfo) {
    println!("👤 {} ({})", npc.name, npc.npc_id);
    if let Some(description) = npc.description.as_deref().filter(|d| !d.is_empty()) {
        println!("   {}", description);
    }
    println!("   attitude: {:+.1}", npc.attitude);
}
