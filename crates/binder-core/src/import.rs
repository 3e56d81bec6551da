//! Collection loading from JSON and CSV files

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{Card, Category, CollectionType};

/// Length of derived card ids (hex characters)
const DERIVED_ID_LEN: usize = 16;

/// Supported collection file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionFormat {
    Json,
    Csv,
}

impl CollectionFormat {
    /// Detect the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(Error::UnsupportedFormat(format!(
                "{} (expected .json or .csv)",
                path.display()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Load a card collection from a `.json` or `.csv` file
///
/// Cards with an id seen earlier in the file are skipped.
pub fn load_collection(path: &Path) -> Result<Vec<Card>> {
    let format = CollectionFormat::from_path(path)?;
    let reader = BufReader::new(File::open(path)?);

    let cards = match format {
        CollectionFormat::Json => parse_json(reader)?,
        CollectionFormat::Csv => parse_csv(reader)?,
    };

    debug!(
        path = %path.display(),
        format = format.as_str(),
        cards = cards.len(),
        "Loaded collection"
    );
    Ok(cards)
}

/// Parse a JSON array of cards
pub fn parse_json<R: Read>(reader: R) -> Result<Vec<Card>> {
    let cards: Vec<Card> = serde_json::from_reader(reader)?;
    Ok(dedupe(cards))
}

/// Column positions, looked up by normalized header name
struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn new(headers: &StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (normalize_header(h), i))
            .collect();
        Self { index }
    }

    /// Trimmed field value; None when the column is absent or the cell empty
    fn get<'r>(&self, record: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.index
            .get(name)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn require<'r>(&self, record: &'r StringRecord, name: &str, row: usize) -> Result<&'r str> {
        self.get(record, name)
            .ok_or_else(|| Error::Import(format!("Row {}: missing {}", row, name)))
    }

    fn text(&self, record: &StringRecord, name: &str) -> String {
        self.get(record, name).unwrap_or_default().to_string()
    }
}

/// "Purchase Price", "purchase_price" and "purchasePrice" all become "purchaseprice"
fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Parse a CSV collection with a header row
///
/// Required columns: category, player, year, purchase price, purchase date
/// and current value. Rows without an id get one derived from their
/// identifying fields.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Card>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::new(rdr.headers()?);
    let mut cards = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let row = i + 2;

        let category: Category = columns
            .require(&record, "category", row)?
            .parse()
            .map_err(|e| Error::Import(format!("Row {}: {}", row, e)))?;
        let year = columns
            .require(&record, "year", row)?
            .parse::<i32>()
            .map_err(|_| Error::Import(format!("Row {}: invalid year", row)))?;

        let sell_price = columns
            .get(&record, "sellprice")
            .map(parse_amount)
            .transpose()?;
        let sell_date = columns
            .get(&record, "selldate")
            .map(parse_date)
            .transpose()?;
        let collection_type = match columns.get(&record, "collectiontype") {
            Some(s) => s
                .parse::<CollectionType>()
                .map_err(|e| Error::Import(format!("Row {}: {}", row, e)))?,
            None => CollectionType::default(),
        };

        let mut card = Card {
            id: columns.text(&record, "id"),
            category,
            player: columns.require(&record, "player", row)?.to_string(),
            team: columns.text(&record, "team"),
            brand: columns.text(&record, "brand"),
            year,
            card_number: columns.text(&record, "cardnumber"),
            condition: columns.text(&record, "condition"),
            parallel: columns.get(&record, "parallel").map(String::from),
            grading_company: columns.get(&record, "gradingcompany").map(String::from),
            purchase_price: parse_amount(columns.require(&record, "purchaseprice", row)?)?,
            purchase_date: parse_date(columns.require(&record, "purchasedate", row)?)?,
            current_value: parse_amount(columns.require(&record, "currentvalue", row)?)?,
            sell_price,
            sell_date,
            collection_type,
        };

        if card.id.is_empty() {
            card.id = derive_card_id(&card);
        }
        cards.push(card);
    }

    debug!("Parsed {} CSV rows", cards.len());
    Ok(dedupe(cards))
}

/// Deterministic id from the fields that identify a physical card
fn derive_card_id(card: &Card) -> String {
    let year = card.year.to_string();
    let purchased = card.purchase_date.to_string();

    let mut hasher = Sha256::new();
    for field in [
        card.category.as_str(),
        card.player.as_str(),
        card.brand.as_str(),
        year.as_str(),
        card.card_number.as_str(),
        card.parallel.as_deref().unwrap_or_default(),
        purchased.as_str(),
    ] {
        hasher.update(field.as_bytes());
        // Separator keeps ("ab", "c") distinct from ("a", "bc")
        hasher.update([0u8]);
    }
    hasher.update(card.purchase_price.to_be_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(DERIVED_ID_LEN);
    id
}

/// Keep the first card for each id
fn dedupe(cards: Vec<Card>) -> Vec<Card> {
    let mut seen = HashSet::new();
    cards
        .into_iter()
        .filter(|card| {
            let fresh = seen.insert(card.id.clone());
            if !fresh {
                warn!(id = %card.id, "Skipping duplicate card");
            }
            fresh
        })
        .collect()
}

/// Parse a date string in one of the common formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%y", // 01/15/24 (before %Y, which also accepts two digits)
        "%m/%d/%Y", // 01/15/2024
        "%m-%d-%Y", // 01-15-2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse a money amount, ignoring currency symbols and thousands separators
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned = s.trim().replace(['$', ',', ' '], "");

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| Error::Import(format!("Unable to parse amount: {}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
Category,Player,Team,Brand,Year,Card Number,Condition,Purchase Price,Purchase Date,Current Value,Sell Price,Sell Date,Collection Type
Baseball,Mike Trout,Angels,Topps Update,2011,US175,PSA 9,$100.00,2022-03-10,180,,,
Basketball,LeBron James,Cavaliers,Upper Deck,2003,221,Near Mint,250,11/02/2021,400,450,2023-06-01,for_sale
";

    #[test]
    fn test_parse_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15").unwrap(), expected);
        assert_eq!(parse_date("01/15/2024").unwrap(), expected);
        assert_eq!(parse_date(" 01/15/24 ").unwrap(), expected);
        assert!(parse_date("15th Jan").is_err());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("$1,234.56").unwrap(), 1234.56);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Purchase Price"), "purchaseprice");
        assert_eq!(normalize_header("purchase_price"), "purchaseprice");
        assert_eq!(normalize_header("\u{feff}purchasePrice"), "purchaseprice");
    }

    #[test]
    fn test_parse_csv() {
        let cards = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(cards.len(), 2);

        let trout = &cards[0];
        assert_eq!(trout.category, Category::Baseball);
        assert_eq!(trout.player, "Mike Trout");
        assert_eq!(trout.card_number, "US175");
        assert_eq!(trout.purchase_price, 100.0);
        assert_eq!(trout.current_value, 180.0);
        assert!(!trout.is_sold());
        assert_eq!(trout.parallel, None);
        assert_eq!(trout.collection_type, CollectionType::Keep);

        let lebron = &cards[1];
        assert_eq!(lebron.purchase_date, NaiveDate::from_ymd_opt(2021, 11, 2).unwrap());
        assert_eq!(lebron.sell_price, Some(450.0));
        assert!(lebron.is_sold());
        assert_eq!(lebron.collection_type, CollectionType::ForSale);
    }

    #[test]
    fn test_derived_ids_are_stable_and_short() {
        let first = parse_csv(CSV.as_bytes()).unwrap();
        let second = parse_csv(CSV.as_bytes()).unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert_eq!(first[0].id.len(), DERIVED_ID_LEN);
        assert!(first[0].id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first[0].id, first[1].id);
    }

    #[test]
    fn test_explicit_id_kept() {
        let csv = "id,category,player,year,purchase_price,purchase_date,current_value\n\
                   trout-1,baseball,Mike Trout,2011,10,2024-01-01,12\n";
        let cards = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(cards[0].id, "trout-1");
    }

    #[test]
    fn test_duplicate_rows_skipped() {
        let csv = "id,category,player,year,purchase_price,purchase_date,current_value\n\
                   a,baseball,First,2011,10,2024-01-01,12\n\
                   a,baseball,Second,2011,10,2024-01-01,12\n\
                   b,football,Third,2019,5,2024-01-01,4\n";
        let cards = parse_csv(csv.as_bytes()).unwrap();
        let players: Vec<&str> = cards.iter().map(|c| c.player.as_str()).collect();
        assert_eq!(players, vec!["First", "Third"]);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "category,player,year,purchase_price,purchase_date\n\
                   baseball,Mike Trout,2011,10,2024-01-01\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Row 2: missing currentvalue"));
    }

    #[test]
    fn test_unknown_category() {
        let csv = "category,player,year,purchase_price,purchase_date,current_value\n\
                   curling,Someone,2011,10,2024-01-01,12\n";
        assert!(matches!(parse_csv(csv.as_bytes()), Err(Error::Import(_))));
    }

    #[test]
    fn test_parse_json() {
        let json = r#"[
            {"id": "x", "category": "pokemon", "player": "Charizard", "year": 1999,
             "purchase_price": 300, "purchase_date": "2020-05-01", "current_value": 900},
            {"id": "x", "category": "pokemon", "player": "Duplicate", "year": 1999,
             "purchase_price": 1, "purchase_date": "2020-05-01", "current_value": 1}
        ]"#;
        let cards = parse_json(json.as_bytes()).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].category, Category::Pokemon);
        assert_eq!(cards[0].brand, "");
        assert_eq!(cards[0].collection_type, CollectionType::Keep);
    }

    #[test]
    fn test_load_collection_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("cards.CSV");
        File::create(&csv_path)
            .unwrap()
            .write_all(CSV.as_bytes())
            .unwrap();
        assert_eq!(load_collection(&csv_path).unwrap().len(), 2);

        let txt_path = dir.path().join("cards.txt");
        File::create(&txt_path).unwrap();
        assert!(matches!(
            load_collection(&txt_path),
            Err(Error::UnsupportedFormat(_))
        ));

        let missing = dir.path().join("missing.json");
        assert!(matches!(load_collection(&missing), Err(Error::Io(_))));
    }
}
