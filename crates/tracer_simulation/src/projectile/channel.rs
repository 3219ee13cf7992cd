//! Channel binding — какие weapon channels считаются "poolable"
//!
//! Два фиксированных слота (First / Second), каждый держит не более одного
//! `ChannelId`. Снаряды каналов вне обоих слотов никогда не попадают в pool.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Opaque идентификатор источника снарядов (оружия)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

/// Pooling partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ChannelSlot {
    First,
    Second,
}

impl ChannelSlot {
    pub const ALL: [ChannelSlot; 2] = [ChannelSlot::First, ChannelSlot::Second];

    pub fn index(self) -> usize {
        match self {
            ChannelSlot::First => 0,
            ChannelSlot::Second => 1,
        }
    }
}

/// Текущая привязка слотов к каналам
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub struct ChannelBinding {
    pub first: Option<ChannelId>,
    pub second: Option<ChannelId>,
}

impl ChannelBinding {
    /// Слот, в который попадает канал (First проверяется раньше Second)
    pub fn slot_of(&self, channel: ChannelId) -> Option<ChannelSlot> {
        if self.first == Some(channel) {
            Some(ChannelSlot::First)
        } else if self.second == Some(channel) {
            Some(ChannelSlot::Second)
        } else {
            None
        }
    }

    pub fn get(&self, slot: ChannelSlot) -> Option<ChannelId> {
        match slot {
            ChannelSlot::First => self.first,
            ChannelSlot::Second => self.second,
        }
    }

    pub(crate) fn set(&mut self, slot: ChannelSlot, channel: ChannelId) {
        match slot {
            ChannelSlot::First => self.first = Some(channel),
            ChannelSlot::Second => self.second = Some(channel),
        }
    }
}
