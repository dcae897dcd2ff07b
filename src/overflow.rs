//! Width-based partitioning of a horizontal item list into visible and
//! overflowed sets, with an observer that recomputes on resize.

use unicode_width::UnicodeWidthStr;

/// Display width of a label in terminal cells.
pub fn label_width(label: &str) -> u16 {
    UnicodeWidthStr::width(label) as u16
}

/// Indices of items that fit and items pushed into the overflow
/// indicator, both in original list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub visible: Vec<usize>,
    pub overflowed: Vec<usize>,
}

/// Partition items by width. When everything fits in the container no
/// space is reserved for an indicator; otherwise a leading run of items
/// is kept visible while it leaves `reserved` cells free for the
/// indicator, and the rest overflow. The first item always stays
/// visible, even when it is wider than the container.
pub fn partition(widths: &[u16], container: u16, reserved: u16) -> Partition {
    let total: u32 = widths.iter().map(|w| u32::from(*w)).sum();
    if total <= u32::from(container) {
        return Partition {
            visible: (0..widths.len()).collect(),
            overflowed: Vec::new(),
        };
    }

    let mut partition = Partition::default();
    let mut used: u32 = 0;
    let mut overflowing = false;
    for (i, width) in widths.iter().enumerate() {
        let width = u32::from(*width);
        if !overflowing && used + width + u32::from(reserved) < u32::from(container) {
            used += width;
            partition.visible.push(i);
        } else {
            // Items never reappear ahead of earlier ones.
            overflowing = true;
            partition.overflowed.push(i);
        }
    }
    // The first item is never hidden entirely, even when it alone is
    // wider than the container; an all-overflow list has nothing left
    // to interact with.
    if partition.visible.is_empty() && !partition.overflowed.is_empty() {
        partition.visible.push(partition.overflowed.remove(0));
    }
    partition
}

/// A list of labelled items partitioned against a live container width.
///
/// Resize notifications are idempotent: recomputation happens only when
/// the width actually changes.
#[derive(Debug)]
pub struct OverflowList {
    labels: Vec<String>,
    reserved: u16,
    container: u16,
    partition: Partition,
}

impl OverflowList {
    pub fn new(labels: Vec<String>, reserved: u16) -> Self {
        let mut list = Self {
            labels,
            reserved,
            container: 0,
            partition: Partition::default(),
        };
        list.recompute();
        list
    }

    /// React to a container resize. Returns whether the partition was
    /// recomputed.
    pub fn notify_resize(&mut self, container: u16) -> bool {
        if container == self.container {
            return false;
        }
        self.container = container;
        self.recompute();
        true
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn visible_labels(&self) -> impl Iterator<Item = &str> {
        self.partition.visible.iter().map(|&i| self.labels[i].as_str())
    }

    pub fn overflowed_labels(&self) -> impl Iterator<Item = &str> {
        self.partition
            .overflowed
            .iter()
            .map(|&i| self.labels[i].as_str())
    }

    pub fn overflow_count(&self) -> usize {
        self.partition.overflowed.len()
    }

    fn recompute(&mut self) {
        let widths: Vec<u16> = self.labels.iter().map(|l| label_width(l)).collect();
        self.partition = partition(&widths, self.container, self.reserved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn everything_fits_without_reservation() {
        let p = partition(&[40, 40, 40], 120, 20);
        assert_eq!(p.visible, vec![0, 1, 2]);
        assert!(p.overflowed.is_empty());
    }

    #[test]
    fn overflow_reserves_indicator_space() {
        // Three 50-wide items in a 120-wide container with 20 reserved:
        // only the first stays visible.
        let p = partition(&[50, 50, 50], 120, 20);
        assert_eq!(p.visible, vec![0]);
        assert_eq!(p.overflowed, vec![1, 2]);
    }

    #[test]
    fn later_items_never_jump_ahead_of_overflowed_ones() {
        // Item 1 is too wide but item 2 would fit; order still wins.
        let p = partition(&[30, 80, 10], 100, 10);
        assert_eq!(p.visible, vec![0]);
        assert_eq!(p.overflowed, vec![1, 2]);
    }

    #[test]
    fn empty_list_is_empty_partition() {
        let p = partition(&[], 100, 10);
        assert!(p.visible.is_empty());
        assert!(p.overflowed.is_empty());
    }

    #[test]
    fn zero_width_container_keeps_only_the_first_item() {
        let p = partition(&[10, 10], 0, 5);
        assert_eq!(p.visible, vec![0]);
        assert_eq!(p.overflowed, vec![1]);
    }

    #[test]
    fn single_oversized_item_stays_visible() {
        let p = partition(&[200], 100, 10);
        assert_eq!(p.visible, vec![0]);
        assert!(p.overflowed.is_empty());
    }

    #[test]
    fn oversized_first_item_never_hides_alone_in_a_list() {
        let p = partition(&[200, 30, 30], 100, 10);
        assert_eq!(p.visible, vec![0]);
        assert_eq!(p.overflowed, vec![1, 2]);
    }

    #[test]
    fn repeated_resize_to_same_width_is_noop() {
        let labels = vec!["Home".to_string(), "About".to_string(), "Archive".to_string()];
        let mut list = OverflowList::new(labels, 8);
        assert!(list.notify_resize(12));
        let snapshot = list.partition().clone();
        assert!(!list.notify_resize(12));
        assert_eq!(*list.partition(), snapshot);
        assert!(list.notify_resize(80));
    }

    #[test]
    fn resize_moves_items_between_sets() {
        let labels = vec![
            "Home".to_string(),    // 4
            "About".to_string(),   // 5
            "Archive".to_string(), // 7
        ];
        let mut list = OverflowList::new(labels, 4);
        list.notify_resize(80);
        assert_eq!(list.overflow_count(), 0);

        list.notify_resize(10);
        assert_eq!(list.visible_labels().collect::<Vec<_>>(), vec!["Home"]);
        assert_eq!(
            list.overflowed_labels().collect::<Vec<_>>(),
            vec!["About", "Archive"]
        );

        list.notify_resize(80);
        assert_eq!(list.overflow_count(), 0);
    }

    #[test]
    fn label_width_counts_display_cells() {
        assert_eq!(label_width("Home"), 4);
        assert_eq!(label_width(""), 0);
        // CJK characters occupy two cells each.
        assert_eq!(label_width("日本語"), 6);
    }
}
