//! Sources of open delivery offers.

use std::collections::HashSet;
use std::path::Path;

use crate::Rupiah;
use crate::csv::{CsvError, read_orders};
use crate::model::{FloatAdvance, Order, OrderId};

/// Where open orders come from.
///
/// Every call returns a freshly built list; there is no cursor and no
/// deduplication across calls.
pub trait OrderSource {
    fn open_orders(&self) -> Vec<Order>;

    /// Look up one open order by id.
    fn find(&self, id: OrderId) -> Option<Order> {
        self.open_orders().into_iter().find(|order| order.id == id)
    }
}

/// Built-in demo offers.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleCatalog;

impl OrderSource for SampleCatalog {
    fn open_orders(&self) -> Vec<Order> {
        vec![
            sample(
                1,
                ("Andi Wijaya", "08223456789"),
                ("Mall Central Park", "Apartemen Taman Anggrek"),
                "2.5 km",
                25_000,
                Some((50_000, "Bayar tagihan listrik di loket mall")),
                15,
            ),
            sample(
                2,
                ("Sari Indah", "08334567890"),
                ("Restoran Padang Sederhana", "Kantor BCA Tower"),
                "3.1 km",
                32_000,
                None,
                18,
            ),
            sample(
                3,
                ("Budi Hartono", "08445678901"),
                ("Apotek Kimia Farma", "Perumahan Green Garden"),
                "4.2 km",
                38_000,
                Some((75_000, "Beli obat diabetes sesuai resep")),
                22,
            ),
        ]
    }
}

fn sample(
    id: OrderId,
    (name, phone): (&str, &str),
    (pickup, delivery): (&str, &str),
    distance: &str,
    fare: i64,
    float_advance: Option<(i64, &str)>,
    duration: u32,
) -> Order {
    Order {
        id,
        customer_name: name.to_string(),
        customer_phone: phone.to_string(),
        pickup_label: pickup.to_string(),
        delivery_label: delivery.to_string(),
        distance_label: distance.to_string(),
        fare: Rupiah::new(fare),
        float_advance: float_advance
            .and_then(|(amount, note)| FloatAdvance::new(Rupiah::new(amount), note)),
        estimated_duration_minutes: duration,
    }
}

/// Orders loaded from a csv feed.
///
/// The feed is validated once at load time; serving orders afterwards cannot fail.
/// Order ids are unique within the feed.
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    orders: Vec<Order>,
}

impl CsvCatalog {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CsvError> {
        let mut seen = HashSet::new();
        let mut orders = Vec::new();

        for (idx, result) in read_orders(path)?.enumerate() {
            let order = result?;
            if !seen.insert(order.id) {
                return Err(CsvError::DuplicateOrder {
                    line: idx + 2,
                    order: order.id,
                });
            }
            orders.push(order);
        }

        Ok(Self { orders })
    }
}

impl OrderSource for CsvCatalog {
    fn open_orders(&self) -> Vec<Order> {
        self.orders.clone()
    }
}

impl<T: OrderSource + ?Sized> OrderSource for Box<T> {
    fn open_orders(&self) -> Vec<Order> {
        (**self).open_orders()
    }
}
