//! Projectile pool — три непересекающихся пула поверх index-stable arena
//!
//! ```text
//! Idle(slot) ──acquire_or_create──▶ Active ──release──▶ Cooldown ──sweep──▶ Idle(slot)
//!     │                               │                    │
//!     └──rebind──▶ Destroyed          └─channel unbound─▶ Destroyed ◀─┘
//! ```
//!
//! Cooldown нужен для trail'ов: если спрятать переиспользуемый визуал
//! мгновенно, в следующем выстреле остаются stale trail-сегменты.
//! Короткая задержка (grace interval) перед `set_active(false)` убирает артефакт.
//!
//! Инвариант: каждый живой record ровно в одном из {idle[First], idle[Second],
//! active, cooldown}. Пулы хранят `RecordIndex`, record'ы не двигаются.

use std::collections::VecDeque;
use std::fmt::Debug;

use super::channel::{ChannelBinding, ChannelId, ChannelSlot};
use super::record::{FireRequest, HitPayload, Membership, ProjectileRecord, RecordIndex};
use super::visual::VisualProvider;

pub struct ProjectilePool<H> {
    records: Vec<Option<ProjectileRecord<H>>>,
    free: Vec<usize>,
    idle: [VecDeque<RecordIndex>; 2],
    active: Vec<RecordIndex>,
    cooldown: Vec<RecordIndex>,
    binding: ChannelBinding,
    grace_interval: f32,
}

/// Задержка перед деактивацией визуала (секунды)
pub const DEFAULT_GRACE_INTERVAL: f32 = 0.1;

impl<H: Copy + Eq + Debug> ProjectilePool<H> {
    pub fn new(grace_interval: f32) -> Self {
        Self {
            records: Vec::new(),
            free: Vec::new(),
            idle: [VecDeque::new(), VecDeque::new()],
            active: Vec::new(),
            cooldown: Vec::new(),
            binding: ChannelBinding::default(),
            grace_interval,
        }
    }

    // ========================================================================
    // Read access
    // ========================================================================

    pub fn binding(&self) -> ChannelBinding {
        self.binding
    }

    pub fn grace_interval(&self) -> f32 {
        self.grace_interval
    }

    pub fn active(&self) -> &[RecordIndex] {
        &self.active
    }

    pub fn cooldown(&self) -> &[RecordIndex] {
        &self.cooldown
    }

    pub fn idle(&self, slot: ChannelSlot) -> &VecDeque<RecordIndex> {
        &self.idle[slot.index()]
    }

    pub fn get(&self, index: RecordIndex) -> Option<&ProjectileRecord<H>> {
        self.records.get(index.0).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, index: RecordIndex) -> Option<&mut ProjectileRecord<H>> {
        self.records.get_mut(index.0).and_then(Option::as_mut)
    }

    pub fn membership(&self, index: RecordIndex) -> Option<Membership> {
        self.get(index).map(|record| record.membership)
    }

    /// Количество живых (не уничтоженных) record'ов
    pub fn live_count(&self) -> usize {
        self.records.len() - self.free.len()
    }

    /// Все живые record'ы в порядке arena
    pub fn iter(&self) -> impl Iterator<Item = (RecordIndex, &ProjectileRecord<H>)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|record| (RecordIndex(i), record)))
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Взять record из idle пула слота (FIFO) или создать новый
    ///
    /// Reuse: визуал переставляется в start position и включается, handle
    /// сохраняется. Create: provider инстанцирует новый визуал.
    pub fn acquire_or_create<V>(
        &mut self,
        slot: ChannelSlot,
        request: &FireRequest,
        payload: Option<HitPayload>,
        visuals: &mut V,
    ) -> RecordIndex
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        let start = request.trajectory.start_position;

        while let Some(index) = self.idle[slot.index()].pop_front() {
            let Some(record) = self.get_mut(index) else {
                crate::log_error(&format!("Stale idle index {:?} in {:?} pool", index, slot));
                continue;
            };

            visuals.set_position(record.visual, start);
            record.copy_from(request);
            record.payload = payload;
            record.visual_position = start;
            record.deactivate_at = None;
            record.membership = Membership::Active;
            visuals.set_active(record.visual, true);

            crate::log(&format!(
                "♻️ Reused projectile {:?} (visual {:?}) for {:?}",
                request.id, record.visual, request.channel
            ));

            self.active.push(index);
            return index;
        }

        let visual = visuals.create(start);
        let index = self.insert(ProjectileRecord::new(request, visual, payload));
        self.active.push(index);

        crate::log(&format!(
            "✨ Created projectile {:?} (visual {:?}) for {:?}, live records: {}",
            request.id,
            visual,
            request.channel,
            self.live_count()
        ));

        index
    }

    /// Убрать один record из active (см. `release_batch`)
    pub fn release<V>(&mut self, index: RecordIndex, now: f32, visuals: &mut V)
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        self.release_batch(&[index], now, visuals);
    }

    /// Убрать record'ы из active одним проходом
    ///
    /// Канал привязан к слоту → Cooldown (`deactivate_at = now + grace`),
    /// иначе визуал уничтожается сразу. Не-active индексы пропускаются.
    pub fn release_batch<V>(&mut self, indices: &[RecordIndex], now: f32, visuals: &mut V)
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        // Mark через membership: повторный индекс уже не Active
        let mut releasing: Vec<RecordIndex> = Vec::with_capacity(indices.len());
        for &index in indices {
            match self.get_mut(index) {
                Some(record) if record.membership == Membership::Active => {
                    record.membership = Membership::Cooldown;
                    releasing.push(index);
                }
                _ => crate::log_warning(&format!(
                    "⚠️ Release of non-active projectile index {:?} ignored",
                    index
                )),
            }
        }

        if releasing.is_empty() {
            return;
        }

        let records = &self.records;
        self.active.retain(|index| {
            records
                .get(index.0)
                .and_then(Option::as_ref)
                .is_some_and(|record| record.membership == Membership::Active)
        });

        let deactivate_at = now + self.grace_interval;
        for index in releasing {
            let bound = self
                .get(index)
                .is_some_and(|record| self.binding.slot_of(record.channel).is_some());

            if !bound {
                self.destroy(index, visuals);
                continue;
            }

            if let Some(record) = self.get_mut(index) {
                record.deactivate_at = Some(deactivate_at);
                self.cooldown.push(index);
            }
        }
    }

    /// Вернуть в idle record'ы, у которых истёк grace interval
    ///
    /// Визуал прячется (не уничтожается). Slot match проверяется повторно:
    /// канал мог быть перепривязан, пока record был в cooldown.
    /// Возвращает число record'ов, вернувшихся в idle.
    pub fn cooldown_sweep<V>(&mut self, now: f32, visuals: &mut V) -> usize
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        if self.cooldown.is_empty() {
            return 0;
        }

        let mut returned = 0;
        let mut pending = Vec::with_capacity(self.cooldown.len());

        for index in std::mem::take(&mut self.cooldown) {
            let Some(record) = self.get_mut(index) else {
                continue;
            };

            let due = record.deactivate_at.is_some_and(|at| now >= at);
            if !due {
                pending.push(index);
                continue;
            }

            visuals.set_active(record.visual, false);
            record.deactivate_at = None;
            let channel = record.channel;

            match self.binding.slot_of(channel) {
                Some(slot) => {
                    if let Some(record) = self.get_mut(index) {
                        record.membership = Membership::Idle(slot);
                    }
                    self.idle[slot.index()].push_back(index);
                    returned += 1;
                }
                None => self.destroy(index, visuals),
            }
        }

        self.cooldown = pending;
        returned
    }

    /// Перепривязать слот к каналу
    ///
    /// Если канал сменился — все idle record'ы слота уничтожаются.
    /// Active/cooldown record'ы старого канала не трогаем: их отловит
    /// slot match при release / sweep. Возвращает `true`, если binding изменился.
    pub fn rebind<V>(&mut self, slot: ChannelSlot, channel: ChannelId, visuals: &mut V) -> bool
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        if self.binding.get(slot) == Some(channel) {
            return false;
        }

        let stale: Vec<RecordIndex> = self.idle[slot.index()].drain(..).collect();
        let destroyed = stale.len();
        for index in stale {
            self.destroy(index, visuals);
        }

        crate::log_info(&format!(
            "🔄 Slot {:?}: {:?} → {:?} ({} idle projectiles destroyed)",
            slot,
            self.binding.get(slot),
            channel,
            destroyed
        ));

        self.binding.set(slot, channel);
        true
    }

    /// Привязать оба слота
    ///
    /// Без второго канала меняется только binding слота First, без
    /// инвалидации idle пулов.
    pub fn set_channels<V>(&mut self, first: ChannelId, second: Option<ChannelId>, visuals: &mut V)
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        match second {
            None => {
                crate::log(&format!("Slot First set to {:?} (single-channel call)", first));
                self.binding.set(ChannelSlot::First, first);
            }
            Some(second) => {
                self.rebind(ChannelSlot::First, first, visuals);
                self.rebind(ChannelSlot::Second, second, visuals);
            }
        }
    }

    /// Уничтожить все record'ы и визуалы (teardown)
    pub fn clear<V>(&mut self, visuals: &mut V)
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        for record in self.records.drain(..).flatten() {
            visuals.destroy(record.visual);
        }
        self.free.clear();
        self.active.clear();
        self.cooldown.clear();
        for idle in &mut self.idle {
            idle.clear();
        }
    }

    // ========================================================================
    // Arena
    // ========================================================================

    fn insert(&mut self, record: ProjectileRecord<H>) -> RecordIndex {
        match self.free.pop() {
            Some(slot) => {
                self.records[slot] = Some(record);
                RecordIndex(slot)
            }
            None => {
                self.records.push(Some(record));
                RecordIndex(self.records.len() - 1)
            }
        }
    }

    /// Terminal transition: визуал уничтожен, arena slot свободен
    fn destroy<V>(&mut self, index: RecordIndex, visuals: &mut V)
    where
        V: VisualProvider<Handle = H> + ?Sized,
    {
        let Some(record) = self.records.get_mut(index.0).and_then(Option::take) else {
            return;
        };

        visuals.destroy(record.visual);
        self.free.push(index.0);

        crate::log(&format!(
            "🗑️ Destroyed projectile {:?} (visual {:?}, channel {:?})",
            record.id, record.visual, record.channel
        ));
    }
}

impl<H: Copy + Eq + Debug> Default for ProjectilePool<H> {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_INTERVAL)
    }
}
