//! Item variants and their constructors.
//!
//! Each variant is a case of [`Variant`] carrying only its own payload.
//! Geometry, overlay and endpoint handling are shared and applied explicitly
//! by [`Canvas::create_with_id`]: the presets are images with a fixed icon and
//! a fixed endpoint layout applied right after construction.

#[cfg(test)]
#[path = "variants_test.rs"]
mod variants_test;

use snapshot::Anchor;

use crate::canvas::Canvas;
use crate::consts::{HANDLE_CUSTOM, HANDLE_DB, HANDLE_EXCLUSIVE_CHOICE, HANDLE_IMAGE, HANDLE_ITEM, HANDLE_MAIL};
use crate::engine::RoutingEngine;
use crate::item::{ItemContent, ItemId};

/// The built-in item variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// A bare container.
    Item,
    /// Arbitrary pre-built markup.
    Custom { markup: String },
    /// A bitmap.
    Image { src: String },
    /// Binary branch: one input on the left, outputs top and bottom.
    ExclusiveChoice,
    /// Mail step: the whole body accepts connections.
    Mail,
    /// Database step: the whole body accepts connections.
    Db,
}

impl Variant {
    /// The serialization discriminator of this variant.
    #[must_use]
    pub fn handle(&self) -> &'static str {
        match self {
            Self::Item => HANDLE_ITEM,
            Self::Custom { .. } => HANDLE_CUSTOM,
            Self::Image { .. } => HANDLE_IMAGE,
            Self::ExclusiveChoice => HANDLE_EXCLUSIVE_CHOICE,
            Self::Mail => HANDLE_MAIL,
            Self::Db => HANDLE_DB,
        }
    }

    fn is_preset(&self) -> bool {
        matches!(self, Self::ExclusiveChoice | Self::Mail | Self::Db)
    }
}

impl<E: RoutingEngine> Canvas<E> {
    /// Create an item of the given variant with a fresh id.
    ///
    /// `width` / `height` override the variant's default size: the configured
    /// item size for plain and custom items, the icon size for images.
    pub fn create(&mut self, variant: Variant, width: Option<f64>, height: Option<f64>) -> ItemId {
        let id = ItemId::new();
        self.build(id.clone(), variant, width, height);
        id
    }

    /// Like [`Canvas::create`] with a caller-chosen id. `None` if the id is
    /// already taken.
    pub fn create_with_id(
        &mut self,
        id: ItemId,
        variant: Variant,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Option<ItemId> {
        if self.item(id.as_str()).is_some() {
            return None;
        }
        self.build(id.clone(), variant, width, height);
        Some(id)
    }

    fn build(&mut self, id: ItemId, variant: Variant, width: Option<f64>, height: Option<f64>) {
        let handle = variant.handle();
        let icon = self.config().icon_size;
        let (content, width, height) = match &variant {
            Variant::Item => (ItemContent::Empty, width, height),
            Variant::Custom { markup } => (ItemContent::Markup(markup.clone()), width, height),
            Variant::Image { src } => {
                (ItemContent::Image { src: src.clone() }, width.or(Some(icon)), height.or(Some(icon)))
            }
            _ => {
                let src = self.config().icon_url(handle);
                (ItemContent::Image { src }, width.or(Some(icon)), height.or(Some(icon)))
            }
        };
        self.attach(id.clone(), handle, content, width, height);

        if !variant.is_preset() {
            return;
        }
        let Some(mut item) = self.item_mut(id.as_str()) else {
            return;
        };
        match variant {
            Variant::ExclusiveChoice => item.anchor(Anchor::LeftMiddle, [Anchor::TopCenter, Anchor::BottomCenter]),
            Variant::Mail | Variant::Db => item.make_target(Some(Anchor::LeftMiddle)),
            _ => {}
        }
    }

    // --- Shorthands ---

    /// A plain item of the configured default size.
    pub fn add_item(&mut self) -> ItemId {
        self.create(Variant::Item, None, None)
    }

    /// An item wrapping `markup`.
    pub fn add_custom(&mut self, markup: impl Into<String>, width: Option<f64>, height: Option<f64>) -> ItemId {
        self.create(Variant::Custom { markup: markup.into() }, width, height)
    }

    /// An item showing the bitmap at `src`.
    pub fn add_image(&mut self, src: impl Into<String>, width: Option<f64>, height: Option<f64>) -> ItemId {
        self.create(Variant::Image { src: src.into() }, width, height)
    }

    pub fn add_exclusive_choice(&mut self) -> ItemId {
        self.create(Variant::ExclusiveChoice, None, None)
    }

    pub fn add_mail(&mut self) -> ItemId {
        self.create(Variant::Mail, None, None)
    }

    pub fn add_db(&mut self) -> ItemId {
        self.create(Variant::Db, None, None)
    }
}
