// Presentation client: fetches the stored ranking from the backend and
// renders it as an HTML table. Writes to stdout, or to the file given as the
// first argument. One fetch, one render, no retry.

use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize)]
struct StoredUser {
    username: String,
    avatar_url: String,
    html_url: String,
    repositories_count: u32,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let backend_url =
        env::var("BACKEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    // On failure the table stays empty, mirroring a page with no rows
    let users = match fetch_users(&backend_url).await {
        Ok(users) => users,
        Err(e) => {
            log::error!("❌ Error fetching users: {}", e);
            Vec::new()
        }
    };

    let page = render_page(&users);

    match env::args().nth(1) {
        Some(path) => {
            if let Err(e) = std::fs::write(&path, page) {
                log::error!("❌ Failed to write {}: {}", path, e);
                std::process::exit(1);
            }
            log::info!("✅ Rendered {} users to {}", users.len(), path);
        }
        None => println!("{}", page),
    }
}

async fn fetch_users(backend_url: &str) -> Result<Vec<StoredUser>, String> {
    let url = format!("{}/get-users", backend_url);
    log::info!("🔍 Fetching users from {}", url);

    let response = reqwest::get(&url)
        .await
        .map_err(|e| format!("Failed to fetch users: {}", e))?;

    if !response.status().is_success() {
        return Err(format!("Backend error: {}", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| format!("Failed to parse users: {}", e))
}

fn render_page(users: &[StoredUser]) -> String {
    let mut rows = String::new();
    for user in users {
        rows.push_str(&format!(
            concat!(
                "            <tr>\n",
                "                <td><img src=\"{avatar}\" alt=\"{name}\" width=\"50\"></td>\n",
                "                <td>{name}</td>\n",
                "                <td>{count}</td>\n",
                "                <td><a href=\"{url}\" target=\"_blank\">View Profile</a></td>\n",
                "            </tr>\n",
            ),
            avatar = user.avatar_url,
            name = user.username,
            count = user.repositories_count,
            url = user.html_url,
        ));
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "    <meta charset=\"UTF-8\">\n",
            "    <title>Top GitHub Users</title>\n",
            "</head>\n",
            "<body>\n",
            "    <table class=\"user-table\">\n",
            "        <thead>\n",
            "            <tr>\n",
            "                <th>Avatar</th>\n",
            "                <th>Username</th>\n",
            "                <th>Repositories</th>\n",
            "                <th>Profile Link</th>\n",
            "            </tr>\n",
            "        </thead>\n",
            "        <tbody>\n",
            "{rows}",
            "        </tbody>\n",
            "    </table>\n",
            "</body>\n",
            "</html>\n",
        ),
        rows = rows,
    )
}
