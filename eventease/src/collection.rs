//! Keyed list helpers that keep slice collections free of duplicate ids

/// Where [`upsert`] places an entity that is not in the list yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    Front,
    Back,
}

/// Insert `item`, replacing any entry with the same key in place
pub(crate) fn upsert<T, K>(items: &mut Vec<T>, item: T, placement: Placement, key: K)
where
    K: Fn(&T) -> &str,
{
    if let Some(existing) = items.iter_mut().find(|existing| key(existing) == key(&item)) {
        *existing = item;
        return;
    }
    match placement {
        Placement::Front => items.insert(0, item),
        Placement::Back => items.push(item),
    }
}

/// Replace the entry with the same key; returns `false` when there is none
pub(crate) fn replace<T, K>(items: &mut [T], item: T, key: K) -> bool
where
    K: Fn(&T) -> &str,
{
    match items.iter_mut().find(|existing| key(existing) == key(&item)) {
        Some(existing) => {
            *existing = item;
            true
        },
        None => false,
    }
}

/// Drop later entries whose key was already seen
pub(crate) fn dedup_by_key<T, K>(items: Vec<T>, key: K) -> Vec<T>
where
    K: Fn(&T) -> &str,
{
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.iter().any(|seen| key(seen) == key(&item)) {
            unique.push(item);
        }
    }
    unique
}
