//! Navigation menu and FAQ accordion state
//!
//! The DOM glue mirrors these into `active` classes.

/// Mobile navigation menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Toggle button pressed
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Click anywhere on the page; closes unless it landed inside the nav.
    /// `inside_nav` is `None` when the page has no nav to test against, and
    /// such clicks never close the menu.
    /// Returns true if the menu was closed by this click.
    pub fn click(&mut self, inside_nav: Option<bool>) -> bool {
        if self.open && inside_nav == Some(false) {
            self.open = false;
            return true;
        }
        false
    }

    /// A nav link was followed
    pub fn follow_link(&mut self) -> bool {
        std::mem::take(&mut self.open)
    }
}

/// FAQ list where at most one answer is expanded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(len: usize) -> Self {
        Self { len, open: None }
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, item: usize) -> bool {
        self.open == Some(item)
    }

    /// Question clicked: collapse the others and flip this one
    pub fn toggle(&mut self, item: usize) {
        if item >= self.len {
            return;
        }
        self.open = if self.open == Some(item) {
            None
        } else {
            Some(item)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_toggle_and_outside_click() {
        let mut menu = NavMenu::default();
        assert!(menu.toggle());
        assert!(!menu.click(Some(true)));
        assert!(menu.is_open());
        assert!(menu.click(Some(false)));
        assert!(!menu.is_open());
        assert!(!menu.click(Some(false)));
    }

    #[test]
    fn test_menu_stays_open_without_nav() {
        let mut menu = NavMenu::default();
        menu.toggle();
        assert!(!menu.click(None));
        assert!(menu.is_open());
    }

    #[test]
    fn test_menu_closes_on_link() {
        let mut menu = NavMenu::default();
        assert!(!menu.follow_link());
        menu.toggle();
        assert!(menu.follow_link());
        assert!(!menu.is_open());
    }

    #[test]
    fn test_accordion_single_open() {
        let mut faq = Accordion::new(3);
        faq.toggle(0);
        assert!(faq.is_open(0));
        faq.toggle(2);
        assert!(!faq.is_open(0));
        assert!(faq.is_open(2));
        faq.toggle(2);
        assert_eq!(faq.open_item(), None);
        faq.toggle(7);
        assert_eq!(faq.open_item(), None);
    }
}
