//! Scroll-derived header state: which section straddles the anchor line.

/// Distance from the viewport top of the line a section must straddle.
pub const ANCHOR_Y: f64 = 120.0;
/// Scroll offset past which the header is considered "scrolled".
pub const SCROLLED_THRESHOLD: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionId {
    About,
    Stack,
    Certs,
}

impl SectionId {
    /// Tracked sections in page order.
    pub const TRACKED: [SectionId; 3] = [SectionId::About, SectionId::Stack, SectionId::Certs];

    pub fn dom_id(self) -> &'static str {
        match self { SectionId::About => "about", SectionId::Stack => "stack", SectionId::Certs => "certs" }
    }

    /// Path shown in the header breadcrumb while the section is active.
    pub fn path(self) -> &'static str {
        match self { SectionId::About => "/about", SectionId::Stack => "/tech-stacks", SectionId::Certs => "/certificates" }
    }

    pub fn nav_key(self) -> &'static str {
        match self { SectionId::About => "nav.about", SectionId::Stack => "nav.stack", SectionId::Certs => "nav.certs" }
    }

    pub fn index(self) -> usize {
        match self { SectionId::About => 0, SectionId::Stack => 1, SectionId::Certs => 2 }
    }
}

/// Vertical extent of a section relative to the viewport top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionRect {
    pub top: f64,
    pub bottom: f64,
}

/// First section with `top <= anchor < bottom`, if any.
pub fn active_section(rects: &[(SectionId, SectionRect)], anchor: f64) -> Option<SectionId> {
    rects.iter().find(|(_, r)| r.top <= anchor && r.bottom > anchor).map(|(id, _)| *id)
}

pub fn is_scrolled(offset: f64) -> bool { offset > SCROLLED_THRESHOLD }

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(top: f64, bottom: f64) -> SectionRect { SectionRect { top, bottom } }

    fn layout(scroll: f64) -> Vec<(SectionId, SectionRect)> {
        // sections laid out at fixed document offsets, shifted by scroll
        let doc = [(SectionId::About, 400.0, 800.0), (SectionId::Stack, 800.0, 1400.0), (SectionId::Certs, 1400.0, 1900.0)];
        doc.iter().map(|(id, t, b)| (*id, rect(t - scroll, b - scroll))).collect()
    }

    #[test]
    fn picks_the_section_straddling_the_anchor() {
        assert_eq!(active_section(&layout(0.0), ANCHOR_Y), None);
        assert_eq!(active_section(&layout(300.0), ANCHOR_Y), Some(SectionId::About));
        assert_eq!(active_section(&layout(900.0), ANCHOR_Y), Some(SectionId::Stack));
        assert_eq!(active_section(&layout(1500.0), ANCHOR_Y), Some(SectionId::Certs));
        assert_eq!(active_section(&layout(2000.0), ANCHOR_Y), None);
    }

    #[test]
    fn boundary_belongs_to_the_lower_section() {
        // About ends and Stack starts exactly at the anchor
        assert_eq!(active_section(&layout(680.0), ANCHOR_Y), Some(SectionId::Stack));
    }

    #[test]
    fn never_reports_more_than_one_section() {
        let mut scroll = 0.0;
        while scroll < 2200.0 {
            let rects = layout(scroll);
            let straddling = rects.iter().filter(|(_, r)| r.top <= ANCHOR_Y && r.bottom > ANCHOR_Y).count();
            assert!(straddling <= 1, "scroll={scroll}");
            assert_eq!(active_section(&rects, ANCHOR_Y).is_some(), straddling == 1);
            scroll += 7.5;
        }
    }

    #[test]
    fn overlapping_rects_resolve_to_first_in_order() {
        let rects = vec![(SectionId::About, rect(0.0, 500.0)), (SectionId::Stack, rect(100.0, 600.0))];
        assert_eq!(active_section(&rects, ANCHOR_Y), Some(SectionId::About));
    }

    #[test]
    fn scrolled_threshold() {
        assert!(!is_scrolled(0.0));
        assert!(!is_scrolled(8.0));
        assert!(is_scrolled(8.5));
    }
}
