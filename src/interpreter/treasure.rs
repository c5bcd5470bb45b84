//! Treasure commands and the text codes that display them

use crate::error::{EventAiError, Result};
use crate::host::{Inventory, ItemData};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::debug;

/// Database a treasure comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreasureKind {
    Item,
    Weapon,
    Armor,
    Gold,
}

/// What a treasure command asks for
#[derive(Debug, Clone, PartialEq)]
pub enum TreasureRequest {
    ById {
        kind: TreasureKind,
        id: i32,
        quantity: i32,
    },
    Gold {
        amount: i32,
    },
    /// Searches items, then weapons, then armors
    ByName {
        name: String,
        quantity: i32,
    },
}

/// The last treasure given, as shown by the treasure text codes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treasure {
    pub id: Option<i32>,
    pub item: Option<ItemData>,
    pub name: String,
    pub icon_index: Option<i32>,
    pub kind: TreasureKind,
    pub amount: i32,
    /// False when the party could not hold any more
    pub success: bool,
}

const NAME_SEARCH_ORDER: [TreasureKind; 3] =
    [TreasureKind::Item, TreasureKind::Weapon, TreasureKind::Armor];

fn find_by_name<I: Inventory + ?Sized>(inventory: &I, name: &str) -> Option<ItemData> {
    let name = name.trim();
    NAME_SEARCH_ORDER.iter().find_map(|kind| {
        inventory
            .items(*kind)
            .into_iter()
            .find(|item| item.name == name)
    })
}

fn give_item<I: Inventory + ?Sized>(inventory: &mut I, item: ItemData, quantity: i32) -> Treasure {
    let success = !inventory.has_max_items(&item);
    if success {
        inventory.gain_item(&item, quantity);
    }
    Treasure {
        id: Some(item.id),
        name: item.name.clone(),
        icon_index: Some(item.icon_index),
        kind: item.kind,
        amount: quantity,
        success,
        item: Some(item),
    }
}

/// Give a treasure to the party
///
/// Items are only given while the party holds fewer than the maximum; gold
/// only while the party is below max gold. Either way the returned
/// descriptor records the attempt.
pub fn give_treasure<I: Inventory + ?Sized>(
    request: &TreasureRequest,
    inventory: &mut I,
) -> Result<Treasure> {
    let treasure = match request {
        TreasureRequest::ById { kind, id, quantity } => {
            let item = inventory
                .item(*kind, *id)
                .ok_or_else(|| EventAiError::NoSuchItem(format!("{:?} {}", kind, id)))?;
            give_item(inventory, item, *quantity)
        }
        TreasureRequest::ByName { name, quantity } => {
            let item = find_by_name(inventory, name)
                .ok_or_else(|| EventAiError::NoSuchItem(name.clone()))?;
            give_item(inventory, item, *quantity)
        }
        TreasureRequest::Gold { amount } => {
            let success = inventory.gold() < inventory.max_gold();
            if success {
                inventory.gain_gold(*amount);
            }
            Treasure {
                id: None,
                item: None,
                name: inventory.currency_unit(),
                icon_index: None,
                kind: TreasureKind::Gold,
                amount: *amount,
                success,
            }
        }
    };
    debug!(
        name = %treasure.name,
        amount = treasure.amount,
        success = treasure.success,
        "treasure given"
    );
    Ok(treasure)
}

static TREASURE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<treasure[ _\-]?name>").expect("valid treasure name pattern"));

static TREASURE_ICON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<treasure[ _\-]?icon>").expect("valid treasure icon pattern"));

static TREASURE_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<treasure[ _\-]?(?:amount|quantity)>").expect("valid treasure amount pattern")
});

/// Replace `<treasure name>`, `<treasure icon>` and `<treasure amount>`
///
/// Text is returned unchanged when no treasure has been given yet. The icon
/// code renders nothing for a treasure without an icon.
pub fn convert_treasure_text_codes<'t>(text: &'t str, treasure: Option<&Treasure>) -> Cow<'t, str> {
    let Some(treasure) = treasure else {
        return Cow::Borrowed(text);
    };
    let icon = match treasure.icon_index {
        Some(index) if index != 0 => format!("\\i[{}]", index),
        _ => String::new(),
    };
    let amount = treasure.amount.to_string();

    let text = TREASURE_NAME.replace_all(text, NoExpand(&treasure.name));
    let text = TREASURE_ICON.replace_all(&text, NoExpand(&icon)).into_owned();
    let text = TREASURE_AMOUNT.replace_all(&text, NoExpand(&amount)).into_owned();
    Cow::Owned(text)
}
