//! Test utilities for binder-core
//!
//! Card fixtures shared by unit tests, integration tests and the CLI tests
//! (via the `test-utils` feature).

use chrono::NaiveDate;

use crate::models::{Card, Category, CollectionType};

/// Build a date, panicking on invalid input (tests only)
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// A held baseball card bought on 2023-01-15
pub fn card(id: &str, player: &str, purchase_price: f64, current_value: f64) -> Card {
    Card {
        id: id.to_string(),
        category: Category::Baseball,
        player: player.to_string(),
        team: String::new(),
        brand: "Topps".to_string(),
        year: 2020,
        card_number: String::new(),
        condition: "Near Mint".to_string(),
        parallel: None,
        grading_company: None,
        purchase_price,
        purchase_date: date(2023, 1, 15),
        current_value,
        sell_price: None,
        sell_date: None,
        collection_type: CollectionType::Keep,
    }
}

/// Mark a card as sold
pub fn sold(mut card: Card, price: f64, on: NaiveDate) -> Card {
    card.sell_price = Some(price);
    card.sell_date = Some(on);
    card
}

/// Set a card's purchase date
pub fn bought(mut card: Card, on: NaiveDate) -> Card {
    card.purchase_date = on;
    card
}

/// A small mixed collection: six cards across three categories, two sold
pub fn sample_collection() -> Vec<Card> {
    let mut trout = card("c1", "Mike Trout", 100.0, 180.0);
    trout.team = "Angels".to_string();
    trout.year = 2011;
    trout.brand = "Topps Update".to_string();
    trout.condition = "PSA 9".to_string();
    trout.grading_company = Some("PSA".to_string());
    trout.purchase_date = date(2022, 3, 10);

    let mut jeter = card("c2", "Derek Jeter", 40.0, 30.0);
    jeter.team = "Yankees".to_string();
    jeter.year = 1993;
    jeter.brand = "SP".to_string();
    jeter.condition = "Excellent".to_string();
    jeter.purchase_date = date(2022, 3, 25);

    let mut lebron = card("c3", "LeBron James", 250.0, 400.0);
    lebron.category = Category::Basketball;
    lebron.team = "Cavaliers".to_string();
    lebron.year = 2003;
    lebron.brand = "Upper Deck".to_string();
    lebron.purchase_date = date(2021, 11, 2);
    let lebron = sold(lebron, 450.0, date(2023, 6, 1));

    let mut curry = card("c4", "Stephen Curry", 80.0, 60.0);
    curry.category = Category::Basketball;
    curry.team = "Warriors".to_string();
    curry.year = 2009;
    curry.brand = "Panini".to_string();
    curry.purchase_date = date(2023, 2, 14);
    curry.collection_type = CollectionType::ForSale;
    let curry = sold(curry, 70.0, date(2023, 9, 30));

    let mut mahomes = card("c5", "Patrick Mahomes", 20.0, 55.0);
    mahomes.category = Category::Football;
    mahomes.team = "Chiefs".to_string();
    mahomes.year = 2017;
    mahomes.brand = "Panini".to_string();
    mahomes.condition = "Near Mint-Mint".to_string();
    mahomes.purchase_date = date(2023, 2, 20);

    let mut bench = card("c6", "Common Player", 0.0, 0.5);
    bench.year = 2020;
    bench.condition = "Very Good".to_string();
    bench.purchase_date = date(2023, 5, 5);

    vec![trout, jeter, lebron, curry, mahomes, bench]
}
