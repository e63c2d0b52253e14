use crate::model::{MixItem, ProductCategory, RankedList, WasteItem};
use crate::vocab::schema::Vocabulary;
use rust_decimal::Decimal;

/// Entries kept per ranked list.
pub const TOP_N: usize = 10;

/// Items that can be ranked by a single metric.
pub trait Ranked: Clone {
    fn rank_metric(&self) -> Decimal;
}

impl Ranked for WasteItem {
    fn rank_metric(&self) -> Decimal {
        self.waste_pct
    }
}

impl Ranked for MixItem {
    fn rank_metric(&self) -> Decimal {
        self.current_pct
    }
}

/// Sort descending by metric and keep the first `limit`.
///
/// The sort is stable: equal metrics keep their extraction order.
pub fn rank<'a, T, I>(label: impl Into<String>, metric: &str, items: I, limit: usize) -> RankedList<T>
where
    T: Ranked + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut sorted: Vec<T> = items.into_iter().cloned().collect();
    sorted.sort_by(|a, b| b.rank_metric().cmp(&a.rank_metric()));
    sorted.truncate(limit);
    RankedList {
        label: label.into(),
        metric: metric.to_string(),
        items: sorted,
    }
}

/// Ranked waste lists, one per product category.
#[derive(Debug, Clone)]
pub struct WasteRanking {
    pub non_pastry: RankedList<WasteItem>,
    pub pastry: RankedList<WasteItem>,
}

pub fn rank_waste(items: &[WasteItem], limit: usize) -> WasteRanking {
    let (pastry, non_pastry): (Vec<&WasteItem>, Vec<&WasteItem>) = items
        .iter()
        .partition(|i| i.category == ProductCategory::Pastry);

    WasteRanking {
        non_pastry: rank(
            format!("Top {} Waste % ({})", limit, ProductCategory::NonPastry),
            "Waste %",
            non_pastry,
            limit,
        ),
        pastry: rank(
            format!("Top {} Waste % ({})", limit, ProductCategory::Pastry),
            "Waste %",
            pastry,
            limit,
        ),
    }
}

/// Rank staff by current mix %, leaving out role placeholders such as "Cashier".
pub fn rank_mix(items: &[MixItem], vocab: &Vocabulary, limit: usize) -> RankedList<MixItem> {
    rank(
        format!("Top {} Single Origin Mix %", limit),
        "Mix %",
        items.iter().filter(|i| !vocab.is_staff_role(&i.name)),
        limit,
    )
}
