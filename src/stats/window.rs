use chrono::{Days, Months, NaiveDate};

/// Lookback/lookahead horizons used by the volatility and performance tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    W1,
    M1,
    M3,
    M6,
    Y1,
}

impl Window {
    pub const ALL: [Window; 5] = [Window::W1, Window::M1, Window::M3, Window::M6, Window::Y1];

    pub fn label(self) -> &'static str {
        match self {
            Window::W1 => "1w",
            Window::M1 => "1m",
            Window::M3 => "3m",
            Window::M6 => "6m",
            Window::Y1 => "1y",
        }
    }

    /// `date` moved back by the window. Month arithmetic clamps to the end of month.
    pub fn before(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Window::W1 => date.checked_sub_days(Days::new(7)),
            _ => date.checked_sub_months(Months::new(self.months())),
        }
    }

    /// `date` moved forward by the window.
    pub fn after(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Window::W1 => date.checked_add_days(Days::new(7)),
            _ => date.checked_add_months(Months::new(self.months())),
        }
    }

    fn months(self) -> u32 {
        match self {
            Window::W1 => 0,
            Window::M1 => 1,
            Window::M3 => 3,
            Window::M6 => 6,
            Window::Y1 => 12,
        }
    }
}

/// Collects one value per window into the five-column layout of the output rows.
pub(crate) fn per_window<F>(mut f: F) -> [Option<f64>; 5]
where
    F: FnMut(Window) -> Option<f64>,
{
    Window::ALL.map(&mut f)
}
