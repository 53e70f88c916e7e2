use crate::runtime::{Runtime, UnitCreationError};
use crate::unit::UnitHandle;

/// Outcome of building a population. Every requested index ends up in
/// exactly one of `created` or `failures`, both in ascending index order.
#[derive(Debug)]
pub struct PopulationResult<A> {
    created: Vec<UnitHandle<A>>,
    failures: Vec<(usize, UnitCreationError)>,
}

impl<A> PopulationResult<A> {
    pub fn created(&self) -> &[UnitHandle<A>] {
        &self.created
    }

    pub fn failures(&self) -> &[(usize, UnitCreationError)] {
        &self.failures
    }

    pub fn requested(&self) -> usize {
        self.created.len() + self.failures.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_parts(
        self,
    ) -> (Vec<UnitHandle<A>>, Vec<(usize, UnitCreationError)>) {
        (self.created, self.failures)
    }
}

/// Creates `count` units one at a time, in index order.
///
/// Construction is never concurrent. Each handle's index equals the index it
/// was requested with. A failed unit is recorded and creation moves on to the
/// next index.
pub async fn create_population<R: Runtime>(
    runtime: &R,
    system: &R::System,
    count: usize,
) -> PopulationResult<R::Address> {
    let mut created = Vec::with_capacity(count);
    let mut failures = Vec::new();

    for index in 0..count {
        match runtime.create_unit(index, system).await {
            Ok(address) => created.push(UnitHandle::new(address, index)),
            Err(error) => failures.push((index, error)),
        }
    }

    PopulationResult { created, failures }
}
