//! Visual-resource provider (trail effects)
//!
//! Pool не знает, что такое визуал: только create / show-hide / move / destroy.
//! Handle — opaque, prefab хранится внутри provider'а.

use bevy::prelude::*;
use std::fmt::Debug;

pub trait VisualProvider {
    type Handle: Copy + Eq + Debug;

    /// Инстанцировать prefab в позиции (новый визуал активен)
    fn create(&mut self, position: Vec3) -> Self::Handle;

    fn set_active(&mut self, handle: Self::Handle, active: bool);

    fn set_position(&mut self, handle: Self::Handle, position: Vec3);

    /// Уничтожить визуал (terminal, handle больше не используется)
    fn destroy(&mut self, handle: Self::Handle);
}
