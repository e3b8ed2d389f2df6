use std::ops::Index;

use super::Repertoire;

/// An ordered collection of repertoires.
///
/// Donor identifiers are kept in a parallel list for lookup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepertoireCollection {
    repertoires: Vec<Repertoire>,
    donor_ids: Vec<String>,
}

impl RepertoireCollection {
    /// Creates a new collection.
    pub fn new(repertoires: Vec<Repertoire>) -> Self {
        let donor_ids = repertoires
            .iter()
            .map(|r| r.donor_id().to_string())
            .collect();

        Self {
            repertoires,
            donor_ids,
        }
    }

    /// Returns the donor identifiers, in the same order as the repertoires.
    pub fn donor_ids(&self) -> &[String] {
        &self.donor_ids
    }

    /// Returns the repertoire at the provided index, if any.
    pub fn get(&self, index: usize) -> Option<&Repertoire> {
        self.repertoires.get(index)
    }

    /// Returns the first repertoire with the provided donor identifier, if any.
    pub fn get_donor(&self, donor_id: &str) -> Option<&Repertoire> {
        self.donor_ids
            .iter()
            .position(|id| id == donor_id)
            .map(|i| &self.repertoires[i])
    }

    /// Returns `true` if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.repertoires.is_empty()
    }

    /// Returns an iterator over repertoires.
    pub fn iter(&self) -> std::slice::Iter<'_, Repertoire> {
        self.repertoires.iter()
    }

    /// Returns the number of repertoires.
    pub fn len(&self) -> usize {
        self.repertoires.len()
    }

    /// Returns the smallest total count in the collection, if not empty.
    pub fn min_total_count(&self) -> Option<f64> {
        self.repertoires
            .iter()
            .map(Repertoire::total_count)
            .min_by(f64::total_cmp)
    }
}

impl From<Vec<Repertoire>> for RepertoireCollection {
    fn from(repertoires: Vec<Repertoire>) -> Self {
        Self::new(repertoires)
    }
}

impl FromIterator<Repertoire> for RepertoireCollection {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Repertoire>,
    {
        Self::new(iter.into_iter().collect())
    }
}

impl Index<usize> for RepertoireCollection {
    type Output = Repertoire;

    fn index(&self, index: usize) -> &Self::Output {
        &self.repertoires[index]
    }
}

impl<'a> IntoIterator for &'a RepertoireCollection {
    type Item = &'a Repertoire;
    type IntoIter = std::slice::Iter<'a, Repertoire>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for RepertoireCollection {
    type Item = Repertoire;
    type IntoIter = std::vec::IntoIter<Repertoire>;

    fn into_iter(self) -> Self::IntoIter {
        self.repertoires.into_iter()
    }
}
