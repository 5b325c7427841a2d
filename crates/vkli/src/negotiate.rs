//! Greedy negotiation of optional capabilities from ordered wish-lists.

use std::ffi::CString;

use vkli_sys::Result;

/// An ordered list of alternative capability names. Earlier names are
/// preferred; at most one name of a list is ever accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PriorityList(Vec<String>);

impl PriorityList {
    /// Creates a list from candidates, most preferred first.
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(candidates.into_iter().map(Into::into).collect())
    }

    /// A list with a single candidate.
    pub fn single(name: impl Into<String>) -> Self {
        Self(vec![name.into()])
    }

    /// The candidates, most preferred first.
    pub fn candidates(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if the list has no candidates.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first candidate for which `available` holds.
    pub fn pick(&self, available: impl Fn(&str) -> bool) -> Option<&str> {
        self.0
            .iter()
            .map(String::as_str)
            .find(|candidate| available(candidate))
    }
}

impl<S: Into<String>> FromIterator<S> for PriorityList {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl From<&[&str]> for PriorityList {
    fn from(value: &[&str]) -> Self {
        Self::new(value.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for PriorityList {
    fn from(value: [&str; N]) -> Self {
        Self::new(value)
    }
}

/// The names accepted by [`negotiate`], in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NegotiatedSet(Vec<String>);

impl NegotiatedSet {
    /// The accepted names.
    pub fn names(&self) -> &[String] {
        &self.0
    }

    /// Returns `true` if `name` was accepted.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|accepted| accepted == name)
    }

    /// The number of accepted names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was accepted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes repeated names, keeping the first occurrence.
    pub fn dedup(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.0.retain(|name| seen.insert(name.clone()));
    }

    /// Returns the accepted names as a list of [`std::ffi::CString`].
    pub fn as_c_strings(&self) -> Result<Vec<CString>> {
        self.0
            .iter()
            .cloned()
            .map(CString::new)
            .collect::<Result<_, _>>()
            .map_err(|_| "Couldn't convert the negotiated names to CStrings.".into())
    }

    /// Consumes the set, returning the names.
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a NegotiatedSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Accepts, for every list independently, its first candidate for which
/// `available` holds. Lists without an available candidate contribute
/// nothing; the same name accepted through two lists appears twice.
pub fn negotiate<'a, I>(lists: I, available: impl Fn(&str) -> bool) -> NegotiatedSet
where
    I: IntoIterator<Item = &'a PriorityList>,
{
    let mut accepted = Vec::new();
    for list in lists {
        match list.pick(&available) {
            Some(name) => accepted.push(name.to_owned()),
            None if list.is_empty() => {}
            None => log::debug!("None of {:?} is available.", list.candidates()),
        }
    }
    NegotiatedSet(accepted)
}
