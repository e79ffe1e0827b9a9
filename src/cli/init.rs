use anyhow::Result;
use std::path::PathBuf;

const SAMPLE_PORTFOLIO: &str = r#"[[projects]]
id = "folio"
title = "Folio"
description = "The service behind this site."
technologies = ["Rust", "SQLite"]
featured = true

[cv]
name = "Your Name"
headline = "Software developer"
summary = "A few lines about you."
skills = ["Rust"]
"#;

pub async fn run(path: PathBuf, name: Option<String>) -> Result<()> {
    let site_name = name.unwrap_or_else(|| "My Portfolio".to_string());
    let config_path = path.join("folio.toml");
    if config_path.exists() {
        anyhow::bail!("{} already exists", config_path.display());
    }

    std::fs::create_dir_all(path.join("data"))?;

    let config = format!(
        r#"[site]
title = "{}"
description = "Portfolio and blog"
url = "http://localhost:3000"
language = "en"

[server]
host = "127.0.0.1"
port = 3000
# static_dir = "./dist"
cors_origins = ["http://localhost:5173"]

[database]
path = "./data/folio.db"

[content]
posts_per_page = 9
max_per_page = 50
excerpt_length = 160
default_category = "General"
default_category_color = "blue"

[content.default_author]
name = "Admin"

[cache]
enabled = true
stale_time_secs = 300
retry = 3

[store]
fallback_to_mock = true

[portfolio]
data_path = "./data/portfolio.toml"

[contact]
enabled = true
max_message_length = 5000
max_per_hour = 5
# webhook_url = "https://example.com/hooks/contact"

[auth]
session_lifetime = "7d"
"#,
        site_name.replace('"', "\\\"")
    );

    std::fs::write(&config_path, config)?;
    let portfolio_path = path.join("data/portfolio.toml");
    if !portfolio_path.exists() {
        std::fs::write(portfolio_path, SAMPLE_PORTFOLIO)?;
    }

    tracing::info!("Created new Folio site at {:?}", path);
    tracing::info!("Run 'folio migrate' to set up the database");
    tracing::info!("Run 'folio user add' to create an admin, then 'folio serve'");

    Ok(())
}
