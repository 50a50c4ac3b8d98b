//! Database seeder for the reseller panel.
//!
//! Admins are never created through the API. This creates the first one
//! from the `seed` config section:
//!
//! ```text
//! RESELLER__SEED__ADMIN_USERNAME=root RESELLER__SEED__ADMIN_PASSWORD=... cargo run --bin seeder
//! ```

use anyhow::Context;

use reseller_core::{Argon2Verifier, CredentialVerifier};
use reseller_db::AdminRepository;
use reseller_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let seed = config
        .seed
        .context("seed.admin_username and seed.admin_password must be set")?;

    println!("Connecting to database...");
    let db = reseller_db::connect_with(&config.database).await?;
    let admins = AdminRepository::new(db);

    if admins.find_by_username(&seed.admin_username).await?.is_some() {
        println!("  Admin '{}' already exists, skipping...", seed.admin_username);
        return Ok(());
    }

    let password_hash = Argon2Verifier::new().hash(&seed.admin_password)?;
    let admin = admins.create(&seed.admin_username, &password_hash).await?;
    println!("  Created admin '{}' ({})", admin.username, admin.id);

    println!("Seeding complete!");
    Ok(())
}
