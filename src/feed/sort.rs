use std::cmp::Ordering;

/// Reorder one fetched page. The sort is stable, so items that compare equal
/// keep the order the API returned them in. Nothing outside `items` is
/// considered: this is not a global ranking.
pub fn sort_page_by<T, F>(items: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    items.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_is_stable() {
        let mut items = vec![(1, 'a'), (3, 'b'), (1, 'c'), (3, 'd'), (2, 'e')];
        sort_page_by(&mut items, |a, b| b.0.cmp(&a.0));
        assert_eq!(
            items,
            vec![(3, 'b'), (3, 'd'), (2, 'e'), (1, 'a'), (1, 'c')]
        );
    }
}
