//! Market records as supplied by the data layer

use std::collections::BTreeMap;

use super::value::parse_display_value;

/// Lifecycle stage of a launch market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Genesis,
    Refund,
    Locked,
    Unlocked,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Genesis, Stage::Refund, Stage::Locked, Stage::Unlocked];

    pub fn title(&self) -> &'static str {
        match self {
            Stage::Genesis => "Genesis",
            Stage::Refund => "Refund",
            Stage::Locked => "Locked",
            Stage::Unlocked => "Unlocked",
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            Stage::Genesis => "genesis",
            Stage::Refund => "refund",
            Stage::Locked => "locked",
            Stage::Unlocked => "unlocked",
        }
    }

    pub fn parse(value: &str) -> Option<Stage> {
        match value.trim().to_lowercase().as_str() {
            "genesis" => Some(Stage::Genesis),
            "refund" => Some(Stage::Refund),
            "locked" => Some(Stage::Locked),
            "unlocked" => Some(Stage::Unlocked),
            _ => None,
        }
    }
}

/// Board mode a market was launched under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Flash,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Normal, Mode::Flash];

    pub fn title(&self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Flash => "Flash",
        }
    }

    pub fn as_query(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Flash => "flash",
        }
    }

    pub fn parse(value: &str) -> Option<Mode> {
        match value.trim().to_lowercase().as_str() {
            "normal" => Some(Mode::Normal),
            "flash" => Some(Mode::Flash),
            _ => None,
        }
    }

    /// Default mode for a lifecycle stage filter. Every stage currently
    /// boards in normal mode; flash boards are opted into explicitly.
    pub fn default_for(_stage: Option<Stage>) -> Mode {
        Mode::Normal
    }
}

/// Raw components behind the computed YT redeemable value column.
///
/// Kept as numbers because deriving the ratio from the formatted display
/// strings would lose precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YieldComponents {
    /// Total value accrued to the yield pool.
    pub accumulated_value: f64,
    /// Current unit price of the underlying asset.
    pub unit_price: f64,
    /// YT tokens outstanding.
    pub outstanding_supply: f64,
}

impl YieldComponents {
    /// Redeemable value per outstanding token. Zero supply yields zero.
    pub fn redeemable_value(&self) -> f64 {
        if self.outstanding_supply == 0.0 {
            0.0
        } else {
            self.accumulated_value * self.unit_price / self.outstanding_supply
        }
    }
}

/// One market row. Column values are the display strings the presentation
/// layer renders ("$1.23B", "12.4%"); `yield_components` backs the one
/// column whose value is computed rather than parsed.
#[derive(Debug, Clone)]
pub struct MarketRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub network: String,
    pub stage: Stage,
    pub mode: Mode,
    pub category: String,
    pub columns: BTreeMap<String, String>,
    pub yield_components: Option<YieldComponents>,
}

impl MarketRecord {
    /// Display value for a column, if the record carries it.
    pub fn display_column(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }

    /// Parsed locked value, the primary magnitude of every market.
    pub fn locked_value(&self) -> f64 {
        self.display_column(super::sort::columns::TOTAL_LOCKED)
            .map(parse_display_value)
            .unwrap_or(0.0)
    }

    /// Asset identity this record groups under. Merging networks folds the
    /// same asset on different chains into one display group.
    pub fn group_key(&self, merge_networks: bool) -> String {
        if merge_networks {
            self.name.trim().to_lowercase()
        } else {
            format!(
                "{}:{}",
                self.name.trim().to_lowercase(),
                self.network.trim().to_lowercase()
            )
        }
    }
}
