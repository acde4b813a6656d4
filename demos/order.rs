//! Walk through a short ordering session against an in-memory menu.
//!
//! Run with: `cargo run --example order`

use pizzeria_cart::{
    ActivityFeed, CartBadge, CartStore, Catalogue, CommandContext, ItemId, Size, TagFilter,
};

const MENU: &str = r#"[
    {"id": 1, "name": "Margherita", "price": 7900, "popular": true, "vegan": true},
    {"id": 2, "name": "Diavola", "price": 8900, "spicy": true, "popular": true},
    {"id": 3, "name": "Quattro Formaggi", "price": 9500},
    {"id": 4, "name": "Lemonade", "price": 2900, "category": "drink"}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let menu = Catalogue::from_json(MENU)?;

    let mut store = CartStore::builder()
        .projection::<CartBadge>()
        .projection::<ActivityFeed>()
        .build();
    let widget = store.subscribe();

    println!("popular:");
    for item in menu.filter(TagFilter {
        popular: true,
        ..TagFilter::default()
    }) {
        println!(
            "  {}: {} / {} / {}",
            item.name,
            item.price_for(Size::Small),
            item.price_for(Size::Medium),
            item.price_for(Size::Large)
        );
    }

    let ctx = CommandContext::default().with_actor("menu-grid");
    let margherita = menu.get(ItemId(1)).ok_or("missing margherita")?;
    for _ in 0..2 {
        store.execute(
            pizzeria_cart::CartCommand::AddItem {
                item: margherita.clone(),
                size: Size::Medium,
            },
            &ctx,
        )?;
    }
    let lemonade = menu.get(ItemId(4)).ok_or("missing lemonade")?;
    store.add_item(lemonade, Size::Small)?;
    store.update_quantity(ItemId(4), Size::Small, 2)?;

    println!("cart:");
    for line in store.lines() {
        println!(
            "  {} x{} ({}) = {}",
            line.name,
            line.quantity,
            line.size,
            line.total_price()
        );
    }

    let badge = store.projection::<CartBadge>()?;
    println!("badge: {} items, {}", badge.total_items, badge.subtotal);
    println!("widget saw version {}", widget.borrow().version);

    let summary = store.order_summary();
    println!(
        "subtotal {}, delivery {}, total {} ({} to free delivery)",
        summary.subtotal, summary.delivery_fee, summary.total, summary.remaining_for_free_delivery
    );

    assert_eq!(store.total_items(), 4);
    assert_eq!(badge.total_items, store.total_items());

    Ok(())
}
