//! Seed the catalog with demo items.

use shopmax_server::db::items::ItemRepository;
use shopmax_server::models::item::CreateItemInput;

use super::CommandError;

/// Demo items inserted by `shopmax-cli seed`.
fn demo_items() -> Vec<CreateItemInput> {
    vec![
        CreateItemInput {
            name: "Canvas Tote Bag".to_string(),
            price: 25_000,
            stock_number: 40,
            detail: "Heavy cotton canvas tote with internal pocket.".to_string(),
            image_urls: vec!["https://images.shopmax.dev/tote-bag.jpg".to_string()],
        },
        CreateItemInput {
            name: "Ceramic Mug".to_string(),
            price: 12_000,
            stock_number: 100,
            detail: "350ml stoneware mug, dishwasher safe.".to_string(),
            image_urls: vec![
                "https://images.shopmax.dev/mug-front.jpg".to_string(),
                "https://images.shopmax.dev/mug-side.jpg".to_string(),
            ],
        },
        CreateItemInput {
            name: "Linen Throw Blanket".to_string(),
            price: 89_000,
            stock_number: 15,
            detail: "Stonewashed linen, 130x170cm.".to_string(),
            image_urls: vec!["https://images.shopmax.dev/throw-blanket.jpg".to_string()],
        },
        CreateItemInput {
            name: "Walnut Desk Organizer".to_string(),
            price: 54_000,
            stock_number: 5,
            detail: "Solid walnut tray with phone stand.".to_string(),
            image_urls: Vec::new(),
        },
    ]
}

/// Insert the demo items.
///
/// # Errors
///
/// Returns `CommandError::Database` if any insert fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let repo = ItemRepository::new(&pool);

    for input in demo_items() {
        let item = repo
            .create_with_images(&input)
            .await
            .map_err(|e| CommandError::Invalid(e.to_string()))?;
        tracing::info!(item_id = %item.item.id, name = %item.item.name, "seeded item");
    }

    tracing::info!("Seeding complete");
    Ok(())
}
