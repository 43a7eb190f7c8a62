// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `piet-glyph-cache`.
//
// `piet-glyph-cache` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `piet-glyph-cache` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `piet-glyph-cache`. If not, see <https://www.gnu.org/licenses/>.

//! The "render glyph" event.

use super::image::GlyphImage;

use piet::kurbo::{Point, Rect};
use piet::Error as Pierror;

use std::fmt;

/// What a listener is told right before a cached glyph is drawn.
#[derive(Debug, Clone, Copy)]
pub struct RenderGlyph<'a> {
    /// The character being drawn.
    pub code: u32,

    /// The image of the page the glyph lives on.
    pub image: &'a GlyphImage,

    /// The top left corner of the glyph on its page.
    pub top_left: Point,

    /// The bottom right corner of the glyph on its page.
    pub bottom_right: Point,
}

impl RenderGlyph<'_> {
    /// The glyph's rectangle on its page, in pixels.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.top_left, self.bottom_right)
    }
}

/// Identifies a listener so that it can be removed later.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&RenderGlyph<'_>) -> Result<(), Pierror>>;

/// The listeners registered for the event, in the order they were added.
#[derive(Default)]
pub(crate) struct Listeners {
    /// The ID handed to the next listener.
    next_id: u64,

    /// The listeners themselves.
    list: Vec<(ListenerId, Listener)>,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.list.iter().map(|(id, _)| id))
            .finish()
    }
}

impl Listeners {
    pub(crate) fn subscribe(
        &mut self,
        listener: impl FnMut(&RenderGlyph<'_>) -> Result<(), Pierror> + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.list.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let len = self.list.len();
        self.list.retain(|(other, _)| *other != id);
        self.list.len() != len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Call every listener in order, stopping at the first one that fails.
    pub(crate) fn notify(&mut self, event: &RenderGlyph<'_>) -> Result<(), Pierror> {
        self.list
            .iter_mut()
            .try_for_each(|(_, listener)| listener(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColorFormat;

    use std::cell::RefCell;
    use std::rc::Rc;

    fn event(image: &GlyphImage) -> RenderGlyph<'_> {
        RenderGlyph {
            code: 65,
            image,
            top_left: Point::new(2.0, 3.0),
            bottom_right: Point::new(6.0, 9.0),
        }
    }

    #[test]
    fn listeners_run_in_order() {
        let image = GlyphImage::new(1, 1, ColorFormat::A8);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut listeners = Listeners::default();

        for tag in ["first", "second"] {
            let seen = seen.clone();
            listeners.subscribe(move |_| {
                seen.borrow_mut().push(tag);
                Ok(())
            });
        }

        listeners.notify(&event(&image)).unwrap();
        assert_eq!(*seen.borrow(), ["first", "second"]);
    }

    #[test]
    fn failure_stops_notification() {
        let image = GlyphImage::new(1, 1, ColorFormat::A8);
        let called = Rc::new(RefCell::new(false));
        let mut listeners = Listeners::default();

        listeners.subscribe(|_| Err(Pierror::NotSupported));
        let flag = called.clone();
        listeners.subscribe(move |_| {
            *flag.borrow_mut() = true;
            Ok(())
        });

        assert!(matches!(
            listeners.notify(&event(&image)),
            Err(Pierror::NotSupported)
        ));
        assert!(!*called.borrow());
    }

    #[test]
    fn unsubscribe_removes_only_that_listener() {
        let mut listeners = Listeners::default();
        let a = listeners.subscribe(|_| Ok(()));
        let b = listeners.subscribe(|_| Ok(()));
        assert_ne!(a, b);

        assert!(listeners.unsubscribe(a));
        assert!(!listeners.unsubscribe(a));
        assert!(!listeners.is_empty());
        assert!(listeners.unsubscribe(b));
        assert!(listeners.is_empty());
    }

    #[test]
    fn rect_spans_corners() {
        let image = GlyphImage::new(1, 1, ColorFormat::A8);
        assert_eq!(event(&image).rect(), Rect::new(2.0, 3.0, 6.0, 9.0));
    }
}
