use std::fmt;
use std::rc::Rc;

use crate::component::Rendered;
use crate::value::Props;

/// An inline renderer: wrapping a remix renders its output in place of a
/// separate base element, and lends the wrapper its display name.
#[derive(Clone)]
pub struct Remix {
    display_name: Option<Rc<str>>,
    renderer: Rc<dyn Fn(&Props) -> Rendered>,
}

impl Remix {
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    pub fn render(&self, props: &Props) -> Rendered {
        (self.renderer)(props)
    }

    pub(crate) fn ptr_eq(&self, other: &Remix) -> bool {
        Rc::ptr_eq(&self.renderer, &other.renderer)
    }
}

impl fmt::Debug for Remix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Remix")
            .field("display_name", &self.display_name)
            .finish()
    }
}

pub fn remix(renderer: impl Fn(&Props) -> Rendered + 'static) -> Remix {
    Remix {
        display_name: None,
        renderer: Rc::new(renderer),
    }
}

pub fn remix_named(
    display_name: impl Into<Rc<str>>,
    renderer: impl Fn(&Props) -> Rendered + 'static,
) -> Remix {
    Remix {
        display_name: Some(display_name.into()),
        renderer: Rc::new(renderer),
    }
}
