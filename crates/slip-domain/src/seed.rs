//! Sample receipts used to initialise an empty store.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::{Category, LineItem, Receipt};

fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn items(entries: &[(&str, f64)]) -> Vec<LineItem> {
    entries
        .iter()
        .map(|(name, price)| LineItem::new(*name, *price))
        .collect()
}

/// Returns the fixed seed collection (five Malaysian household receipts).
pub fn seed_receipts() -> Vec<Receipt> {
    vec![
        Receipt {
            id: "1".into(),
            store_name: "Jaya Grocer".into(),
            date: day(2024, 12, 15),
            total: 87.40,
            category: Category::Food,
            items: items(&[
                ("Pisang Berangan 1kg", 6.90),
                ("Susu Dutch Lady 1L", 7.50),
                ("Ayam Whole (1.2kg)", 15.80),
                ("Sayur Campur", 4.50),
                ("Roti Gardenia", 3.70),
                ("Telur Gred A (10 biji)", 8.90),
                ("Beras Jasmine 5kg", 28.90),
                ("Milo 1kg", 11.20),
            ]),
            notes: Some("Belanja mingguan".into()),
            image_url: None,
            created_at: at(2024, 12, 15, 10, 30),
        },
        Receipt {
            id: "2".into(),
            store_name: "Petronas".into(),
            date: day(2024, 12, 14),
            total: 120.00,
            category: Category::Transport,
            items: items(&[
                ("RON95 (45 liter)", 103.05),
                ("Air Mineral 1.5L", 2.50),
                ("Cuci Kereta", 14.45),
            ]),
            notes: Some("Isi minyak penuh".into()),
            image_url: None,
            created_at: at(2024, 12, 14, 16, 45),
        },
        Receipt {
            id: "3".into(),
            store_name: "MR DIY".into(),
            date: day(2024, 12, 12),
            total: 68.70,
            category: Category::Shopping,
            items: items(&[
                ("Lampu LED", 15.90),
                ("Penyangkut Baju (10 pcs)", 8.90),
                ("Kabel USB-C", 12.90),
                ("Bekas Plastik Set", 19.90),
                ("Pita Pelekat", 5.90),
                ("Bateri AA (4 pcs)", 5.20),
            ]),
            notes: Some("Barang rumah".into()),
            image_url: None,
            created_at: at(2024, 12, 12, 14, 20),
        },
        Receipt {
            id: "4".into(),
            store_name: "Netflix Malaysia".into(),
            date: day(2024, 12, 1),
            total: 54.90,
            category: Category::Entertainment,
            items: items(&[("Langganan Bulanan (Standard)", 54.90)]),
            notes: Some("Pelan Standard".into()),
            image_url: None,
            created_at: at(2024, 12, 1, 0, 0),
        },
        Receipt {
            id: "5".into(),
            store_name: "TNB".into(),
            date: day(2024, 12, 5),
            total: 156.80,
            category: Category::Utilities,
            items: items(&[("Bil Elektrik - Disember", 156.80)]),
            notes: Some("Bil bulanan".into()),
            image_url: None,
            created_at: at(2024, 12, 5, 9, 0),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_ids_are_unique() {
        let seed = seed_receipts();
        let ids: HashSet<_> = seed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), seed.len());
    }

    #[test]
    fn seed_covers_five_categories() {
        let categories: HashSet<_> = seed_receipts().iter().map(|r| r.category).collect();
        assert_eq!(categories.len(), 5);
        assert!(!categories.contains(&Category::Other));
    }
}
