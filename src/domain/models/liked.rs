#[cfg(test)]
#[path = "liked_test.rs"]
mod tests;

/// Movie ids the user liked. Iterates in insertion order, which is the order
/// recommendation sections are rendered in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LikedSet {
    ids: Vec<i64>,
}

impl LikedSet {
    pub fn contains(&self, movie_id: i64) -> bool {
        return self.ids.contains(&movie_id);
    }

    /// Returns false when the id was already present.
    pub fn insert(&mut self, movie_id: i64) -> bool {
        if self.contains(movie_id) {
            return false;
        }

        self.ids.push(movie_id);
        return true;
    }

    pub fn remove(&mut self, movie_id: i64) -> bool {
        let len = self.ids.len();
        self.ids.retain(|id| return *id != movie_id);

        return self.ids.len() != len;
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        return self.ids.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.ids.is_empty();
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        return self.ids.iter().copied();
    }
}
