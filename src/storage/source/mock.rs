//! In-memory record source with fixed demo data.
//!
//! Rows are composed from small hand-written tables with index arithmetic, so
//! every call returns exactly the same records. Keys follow the registry order
//! of each category.

use crate::models::{CellValue, ExportCategory, Record};
use crate::schema::DEFAULT_CURRENCY;
use crate::storage::traits::RecordSource;
use crate::{Error, Result};
use std::collections::BTreeSet;

/// Number of orders in the demo dataset; larger than both document row caps.
pub const MOCK_ORDER_COUNT: usize = 36;

const PEOPLE: &[&str] = &[
    "Ivan Petrov",
    "Maria Sokolova",
    "Alexei Smirnov",
    "Olga Kuznetsova",
    "Dmitry Volkov",
    "Elena Morozova",
    "Sergei Popov",
    "Anna Lebedeva",
    "Nikolai Kozlov",
];

const OPERATORS: &[&str] = &["Irina Belova", "Pavel Orlov", "Svetlana Titova", "Roman Gusev"];

const SERVICES: &[&str] = &[
    "Fiber internet 500",
    "Fiber internet 100",
    "IPTV basic",
    "Landline",
    "Router rental",
    "Static IP",
];

const STREETS: &[&str] = &[
    "Lenina st.",
    "Sadovaya st.",
    "Mira ave.",
    "Gagarina st.",
    "Pushkina st.",
];

const ORDER_STATUSES: &[&str] = &["New", "In progress", "Scheduled", "Completed", "Cancelled"];

/// In-memory [`RecordSource`] serving fixed demo datasets.
///
/// # Example
///
/// ```rust,ignore
/// use backoffice_export::{ExportCategory, MockRecordSource, RecordSource};
///
/// let source = MockRecordSource::new();
/// assert_eq!(source.records(ExportCategory::Orders)?.len(), 36);
/// ```
#[derive(Debug, Clone)]
pub struct MockRecordSource {
    categories: BTreeSet<ExportCategory>,
}

impl Default for MockRecordSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecordSource {
    /// Creates a source serving every category.
    #[must_use]
    pub fn new() -> Self {
        Self::with_categories(ExportCategory::all().iter().copied())
    }

    /// Creates a source serving only the given categories.
    #[must_use]
    pub fn with_categories(categories: impl IntoIterator<Item = ExportCategory>) -> Self {
        Self {
            categories: categories.into_iter().collect(),
        }
    }

    fn dataset(category: ExportCategory) -> Vec<Record> {
        match category {
            ExportCategory::Inventory => inventory(),
            ExportCategory::IssuedItems => issued_items(),
            ExportCategory::Orders => orders(),
            ExportCategory::Statistics => statistics(),
            ExportCategory::Users => users(),
            ExportCategory::Feedback => feedback(),
            ExportCategory::Workflow => workflow(),
            ExportCategory::Calls => calls(),
        }
    }
}

impl RecordSource for MockRecordSource {
    fn records(&self, category: ExportCategory) -> Result<Vec<Record>> {
        if !self.supports(category) {
            return Err(Error::UnknownCategory(category.to_string()));
        }
        Ok(Self::dataset(category))
    }

    fn supports(&self, category: ExportCategory) -> bool {
        self.categories.contains(&category)
    }
}

fn pick<'a>(table: &[&'a str], i: usize) -> &'a str {
    table[i % table.len()]
}

fn day(month: u32, day: usize) -> CellValue {
    CellValue::date(2024, month, u32::try_from(day % 28 + 1).unwrap_or(1))
}

fn int(n: usize) -> CellValue {
    CellValue::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}

fn inventory() -> Vec<Record> {
    const ITEMS: &[(&str, &str, &str, i64, i64)] = &[
        ("RT-AX53", "Router TP-Link Archer AX53", "Network", 148, 649_000),
        ("ON-HG8245", "ONT Huawei HG8245H", "Network", 312, 389_000),
        ("SW-2210", "Switch D-Link DES-1210", "Network", 27, 1_290_000),
        ("STB-M200", "Set-top box Magicbox M200", "TV", 95, 420_000),
        ("CB-UTP5E", "UTP cable cat.5e, 305 m", "Cable", 1_234_567, 9_900),
        ("CB-PATCH2", "Patch cord 2 m", "Cable", 2_480, 15_000),
        ("PH-GS100", "SIP phone Grandstream", "Voice", 41, 310_000),
        ("PS-12V2A", "Power adapter 12V 2A", "Spare parts", 0, 45_000),
    ];
    ITEMS
        .iter()
        .enumerate()
        .map(|(i, (sku, name, group, qty, price))| {
            Record::new()
                .with("sku", *sku)
                .with("name", *name)
                .with("item_group", *group)
                .with("quantity", *qty)
                .with("unit_price", CellValue::money_cents(*price, DEFAULT_CURRENCY))
                .with("warehouse", if i % 3 == 0 { "North" } else { "Central" })
                .with("updated_on", day(3, i * 3))
        })
        .collect()
}

fn issued_items() -> Vec<Record> {
    const ITEMS: &[&str] = &[
        "Router TP-Link Archer AX53",
        "ONT Huawei HG8245H",
        "Set-top box Magicbox M200",
        "Patch cord 2 m",
    ];
    (0..12)
        .map(|i| {
            Record::new()
                .with("issue_id", format!("ISS-{:04}", 510 + i).as_str())
                .with("item", pick(ITEMS, i))
                .with("serial", format!("SN{:08}", 40_210_000 + i * 37).as_str())
                .with("recipient", pick(PEOPLE, i + 2))
                .with("quantity", int(1 + i % 3))
                .with("issued_on", day(4, i * 2))
                .with("issued_by", pick(OPERATORS, i))
        })
        .collect()
}

fn orders() -> Vec<Record> {
    (0..MOCK_ORDER_COUNT)
        .map(|i| {
            let address = if i % 11 == 7 {
                CellValue::Missing
            } else {
                CellValue::text(format!("{}, {}", pick(STREETS, i), 3 + i * 2))
            };
            let cents = i64::try_from(49_000 + (i % 9) * 35_050).unwrap_or_default();
            Record::new()
                .with("order_id", format!("ORD-{:05}", 10_240 + i).as_str())
                .with("customer", pick(PEOPLE, i))
                .with("service", pick(SERVICES, i))
                .with("address", address)
                .with("amount", CellValue::money_cents(cents, DEFAULT_CURRENCY))
                .with("status", CellValue::display(pick(ORDER_STATUSES, i)))
                .with("created_on", day(5, i))
        })
        .collect()
}

fn statistics() -> Vec<Record> {
    const METRICS: &[(&str, i64)] = &[
        ("Calls handled", 4_812),
        ("Orders created", 1_375),
        ("Orders completed", 1_190),
        ("Equipment issued", 642),
        ("Feedback received", 318),
    ];
    const PERIODS: &[(&str, &str)] = &[("2024-04", "+4.2%"), ("2024-05", "-1.8%")];
    METRICS
        .iter()
        .flat_map(|(metric, base)| {
            PERIODS.iter().enumerate().map(move |(p, (period, change))| {
                Record::new()
                    .with("metric", *metric)
                    .with("period", *period)
                    .with("value", base + i64::try_from(p).unwrap_or_default() * 57)
                    .with("change", CellValue::display(*change))
            })
        })
        .collect()
}

fn users() -> Vec<Record> {
    const ROLES: &[(&str, &str)] = &[
        ("Call center", "Customer care"),
        ("Supervisor", "Customer care"),
        ("Warehouse", "Logistics"),
        ("Manager", "Sales"),
        ("Controller", "Finance"),
    ];
    PEOPLE
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let (role, department) = ROLES[i % ROLES.len()];
            let phone = if i == 4 {
                CellValue::Missing
            } else {
                CellValue::text(format!("+7 900 {:03}-{:02}-{:02}", 120 + i, 10 + i, 40 + i))
            };
            Record::new()
                .with("user_id", int(1001 + i))
                .with("full_name", *name)
                .with("role", CellValue::display(role))
                .with("phone", phone)
                .with("department", department)
                .with(
                    "registered_on",
                    CellValue::date(2023, 1 + u32::try_from(i).unwrap_or(0), 15),
                )
        })
        .collect()
}

fn feedback() -> Vec<Record> {
    const COMMENTS: &[&str] = &[
        "Technician arrived on time and fixed the connection quickly",
        "Internet drops every evening, still waiting for a callback",
        "",
        "Friendly operator",
        "Router replacement took two weeks, which is far too long for a simple swap",
    ];
    const CHANNELS: &[&str] = &["Phone", "Bot", "E-mail"];
    (0..10)
        .map(|i| {
            Record::new()
                .with("ticket", format!("FB-{:04}", 300 + i).as_str())
                .with("customer", pick(PEOPLE, i + 4))
                .with("rating", int(1 + (i * 3) % 5))
                .with("comment", pick(COMMENTS, i))
                .with("channel", CellValue::display(pick(CHANNELS, i)))
                .with("received_on", day(5, i * 3))
        })
        .collect()
}

fn workflow() -> Vec<Record> {
    const TASKS: &[&str] = &[
        "Connect new subscriber",
        "Replace faulty ONT",
        "Inventory audit",
        "Move landline",
        "Close stale tickets",
    ];
    const STAGES: &[&str] = &["Backlog", "In progress", "Review", "Done"];
    const PRIORITIES: &[&str] = &["Low", "Normal", "High"];
    (0..9)
        .map(|i| {
            Record::new()
                .with("task_id", format!("T-{}", 700 + i).as_str())
                .with("title", pick(TASKS, i))
                .with("assignee", pick(OPERATORS, i + 1))
                .with("stage", CellValue::display(pick(STAGES, i)))
                .with("due_on", day(6, i * 4))
                .with("priority", CellValue::display(pick(PRIORITIES, i)))
        })
        .collect()
}

fn calls() -> Vec<Record> {
    const TOPICS: &[&str] = &[
        "No internet",
        "Billing question",
        "Tariff change",
        "Equipment return",
        "New connection",
    ];
    const OUTCOMES: &[&str] = &["Resolved", "Escalated", "Callback", "Order created"];
    (0..24)
        .map(|i| {
            Record::new()
                .with("call_id", format!("C-{:06}", 88_100 + i * 3).as_str())
                .with("operator", pick(OPERATORS, i))
                .with(
                    "customer_phone",
                    format!("+7 912 {:03}-{:02}-{:02}", 300 + i * 7, i, 99 - i).as_str(),
                )
                .with("topic", pick(TOPICS, i))
                .with("duration_sec", int(45 + (i * 53) % 600))
                .with("outcome", CellValue::display(pick(OUTCOMES, i)))
                .with("called_on", day(5, i))
        })
        .collect()
}
