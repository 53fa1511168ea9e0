use ratatui::layout::{Margin, Rect};

/// Center a `width` x `height` box inside `r`; 0 keeps the full extent
pub fn centered(width: u16, height: u16, r: Rect) -> Rect {
    let horizontal = if width == 0 {
        0
    } else {
        r.width.saturating_sub(width) / 2
    };
    let vertical = if height == 0 {
        0
    } else {
        r.height.saturating_sub(height) / 2
    };
    r.inner(&Margin {
        horizontal,
        vertical,
    })
}

/// Split off the first `height` rows
pub fn take_top(height: u16, r: Rect) -> (Rect, Rect) {
    let height = height.min(r.height);
    let top = Rect { height, ..r };
    let rest = Rect {
        y: r.y + height,
        height: r.height - height,
        ..r
    };
    (top, rest)
}

/// Split off the last `height` rows
pub fn take_bottom(height: u16, r: Rect) -> (Rect, Rect) {
    let height = height.min(r.height);
    let rest = Rect {
        height: r.height - height,
        ..r
    };
    let bottom = Rect {
        y: r.y + r.height - height,
        height,
        ..r
    };
    (rest, bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_box() {
        let r = Rect::new(0, 0, 100, 40);
        assert_eq!(centered(50, 10, r), Rect::new(25, 15, 50, 10));
        assert_eq!(centered(0, 10, r), Rect::new(0, 15, 100, 10));
    }

    #[test]
    fn splits_rows() {
        let r = Rect::new(0, 0, 80, 24);
        let (top, rest) = take_top(1, r);
        assert_eq!(top, Rect::new(0, 0, 80, 1));
        assert_eq!(rest, Rect::new(0, 1, 80, 23));
        let (rest, bottom) = take_bottom(1, rest);
        assert_eq!(bottom, Rect::new(0, 23, 80, 1));
        assert_eq!(rest, Rect::new(0, 1, 80, 22));
        assert_eq!(take_top(5, Rect::new(0, 0, 10, 2)).0.height, 2);
    }
}
