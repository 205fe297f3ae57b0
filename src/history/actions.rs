use crate::core::SplitEvent;
use crate::history::assemble::BarZone;
use crate::history::wire::Events;

/// Split events from the chart payload, ascending by effective date.
pub(crate) fn extract_splits(events: Option<&Events>, zone: BarZone) -> Vec<SplitEvent> {
    let Some(splits) = events.and_then(|ev| ev.splits.as_ref()) else {
        return Vec::new();
    };

    let mut out: Vec<SplitEvent> = splits
        .iter()
        .filter_map(|(k, s)| {
            let ts = k.parse::<i64>().ok().or(s.date)?;
            let (numerator, denominator) =
                if let (Some(n), Some(d)) = (s.numerator, s.denominator) {
                    (u32::try_from(n).ok()?, u32::try_from(d).ok()?)
                } else if let Some(r) = s.split_ratio.as_deref() {
                    let mut it = r.split(['/', ':']);
                    let n = it.next().and_then(|x| x.trim().parse::<u32>().ok()).unwrap_or(1);
                    let d = it.next().and_then(|x| x.trim().parse::<u32>().ok()).unwrap_or(1);
                    (n, d)
                } else {
                    (1, 1)
                };
            Some(SplitEvent {
                date: zone.date_of(ts)?,
                numerator,
                denominator,
            })
        })
        .collect();

    out.sort_by_key(|s| s.date);
    out
}
