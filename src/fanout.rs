//! Fan-out of a small dataset pool to many chart series.
//!
//! Several series share one dataset to save generation time and memory; the
//! scheduler then reads each dataset once per index and delivers the batch to
//! every member of the group.

use rand::Rng;

use crate::dataset::Dataset;
use crate::error::FanoutError;

/// One dataset and every consumer reading it.
#[derive(Debug, Clone)]
pub struct ConsumerGroup<C> {
    pub dataset: Dataset,
    pub members: Vec<C>,
}

/// Assign each consumer a uniformly random dataset, then group by dataset.
pub fn assign_groups<C, R>(
    consumers: Vec<C>,
    datasets: &[Dataset],
    rng: &mut R,
) -> Result<Vec<ConsumerGroup<C>>, FanoutError>
where
    R: Rng + ?Sized,
{
    if datasets.is_empty() {
        return Err(FanoutError::NoDatasets);
    }
    let pairs = consumers
        .into_iter()
        .map(|c| (c, datasets[rng.gen_range(0..datasets.len())].clone()));
    Ok(group_by_dataset(pairs))
}

/// Group `(consumer, dataset)` pairs by dataset identity.
///
/// Groups are ordered by first appearance; members keep their input order.
pub fn group_by_dataset<C>(
    pairs: impl IntoIterator<Item = (C, Dataset)>,
) -> Vec<ConsumerGroup<C>> {
    let mut groups: Vec<ConsumerGroup<C>> = Vec::new();
    for (consumer, dataset) in pairs {
        match groups.iter_mut().find(|g| g.dataset.same_as(&dataset)) {
            Some(group) => group.members.push(consumer),
            None => groups.push(ConsumerGroup {
                dataset,
                members: vec![consumer],
            }),
        }
    }
    groups
}
