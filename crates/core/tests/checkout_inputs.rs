//! Checkout input handling end to end within the domain crate

use testresult::TestResult;
use tiffin::{
    cart::{CartItem, CartStore},
    payment::{PaymentDetails, PaymentField},
    tokens::TokenNumber,
};
use uuid::Uuid;

fn visa(card_number: &str, expiry_year: &str) -> PaymentDetails {
    PaymentDetails {
        card_type: "Visa".to_string(),
        name_on_card: "Alice".to_string(),
        card_number: card_number.to_string(),
        expiry_month: "12".to_string(),
        expiry_year: expiry_year.to_string(),
        cvv: "321".to_string(),
    }
}

#[test]
fn rice_order_totals_and_masks() -> TestResult {
    let mut cart = CartStore::new();
    let rice = CartItem {
        item_id: Uuid::now_v7(),
        name: "Rice".to_string(),
        image_ref: None,
    };

    cart.add(rice, 2, 300)?;

    let card = visa("4111111111111234", "2030").validate(2026)?;

    assert_eq!(cart.total(), 600);
    assert_eq!(card.last4, "1234");
    assert_eq!(card.expiry, "12/2030");

    Ok(())
}

#[test]
fn rejections_name_the_field() {
    let short = visa("411111111111123", "2030").validate(2026);
    let expired = visa("4111111111111234", "2020").validate(2026);

    assert_eq!(short.err().map(|e| e.field), Some(PaymentField::CardNumber));
    assert_eq!(expired.err().map(|e| e.field), Some(PaymentField::ExpiryYear));
}

#[test]
fn token_numbers_order_by_sequence() {
    let first = TokenNumber::new(999);
    let second = TokenNumber::new(1_000);

    assert!(first < second);
    assert_eq!(second.short_code(), "000");
}
