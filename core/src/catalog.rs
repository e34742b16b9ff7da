//! Immutable item and block metadata loaded once at startup.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BlockId, Rgb};

/// Mining time assumed for blocks whose catalog entry omits one.
pub const MIN_MINING_TIME: u32 = 1;

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.toml");

/// Broad item category deciding what the use action does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    /// Placeable block.
    Block,
    /// Consumable that refills the food meter.
    Food,
    /// Held weapon dealing its configured damage.
    Weapon,
}

/// Catalog entry describing a single item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Category of the item.
    pub category: ItemCategory,
    /// Free-form grouping label (soil, rock, ore, ...).
    #[serde(default)]
    pub group: String,
    /// Ticks of continuous mining needed to break the associated block.
    #[serde(default)]
    pub mining_time: Option<u32>,
    /// Block placed by, and dropped as, this item.
    #[serde(default)]
    pub block_id: Option<BlockId>,
    /// Damage dealt when the item is used as a weapon.
    #[serde(default)]
    pub damage: u32,
    /// Presentation color.
    #[serde(default)]
    pub color: Option<Rgb>,
}

/// Failures raised while loading a block catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The table could not be parsed.
    #[error("malformed catalog table: {0}")]
    Parse(#[from] toml::de::Error),
    /// Two items claim the same block.
    #[error("block {block:?} is claimed by both `{first}` and `{second}`")]
    DuplicateBlock {
        /// Block claimed twice.
        block: BlockId,
        /// Item that claimed the block first in name order.
        first: String,
        /// Item that claimed the block second in name order.
        second: String,
    },
    /// An item declares the empty block as its placed block.
    #[error("item `{item}` cannot map to the empty block")]
    EmptyBlock {
        /// Offending item name.
        item: String,
    },
}

/// Read-only lookup from item names and block ids to their metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockCatalog {
    items: BTreeMap<String, ItemInfo>,
    block_items: BTreeMap<BlockId, String>,
    mining_times: BTreeMap<BlockId, u32>,
}

impl BlockCatalog {
    /// Loads the catalog embedded in this crate.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parses a TOML table keyed by item name.
    ///
    /// Block items without a positive mining time are accepted with
    /// [`MIN_MINING_TIME`] and reported once here.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let items: BTreeMap<String, ItemInfo> = toml::from_str(source)?;
        let mut block_items: BTreeMap<BlockId, String> = BTreeMap::new();
        let mut mining_times = BTreeMap::new();
        for (name, info) in &items {
            let Some(block) = info.block_id else {
                continue;
            };
            if block == BlockId::Empty {
                return Err(CatalogError::EmptyBlock { item: name.clone() });
            }
            if let Some(first) = block_items.get(&block) {
                return Err(CatalogError::DuplicateBlock {
                    block,
                    first: first.clone(),
                    second: name.clone(),
                });
            }
            let _ = block_items.insert(block, name.clone());

            let ticks = match info.mining_time {
                Some(ticks) if ticks >= MIN_MINING_TIME => ticks,
                _ => {
                    warn!("item `{name}` has no usable mining time, using {MIN_MINING_TIME}");
                    MIN_MINING_TIME
                }
            };
            let _ = mining_times.insert(block, ticks);
        }
        Ok(Self {
            items,
            block_items,
            mining_times,
        })
    }

    /// Metadata for the named item.
    #[must_use]
    pub fn info(&self, item: &str) -> Option<&ItemInfo> {
        self.items.get(item)
    }

    /// Item dropped when the block is mined.
    #[must_use]
    pub fn item_for_block(&self, block: BlockId) -> Option<&str> {
        self.block_items.get(&block).map(String::as_str)
    }

    /// Block placed when the named item is used.
    #[must_use]
    pub fn block_for_item(&self, item: &str) -> Option<BlockId> {
        self.info(item).and_then(|info| info.block_id)
    }

    /// Ticks required to mine the block, never less than [`MIN_MINING_TIME`].
    #[must_use]
    pub fn mining_time(&self, block: BlockId) -> u32 {
        self.mining_times
            .get(&block)
            .copied()
            .unwrap_or(MIN_MINING_TIME)
    }
}
