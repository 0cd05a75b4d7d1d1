//! Aggregate ranking across reviewers

use super::entities::{Ranking, Response};
use crate::core::id::{AgentId, ResponseId};
use serde::{Deserialize, Serialize};

/// A response's combined standing across all Stage-2 rankings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateRanking {
    pub response_id: ResponseId,
    pub member_id: AgentId,
    /// 1-based positions, one per ranking that placed this response
    pub positions: Vec<usize>,
    pub avg_rank: f64,
}

impl AggregateRanking {
    pub fn votes(&self) -> usize {
        self.positions.len()
    }
}

/// Average each response's positions across `rankings` (lower is better).
///
/// Responses no reviewer placed are omitted. Ties keep submission order.
pub fn aggregate_rankings(responses: &[Response], rankings: &[Ranking]) -> Vec<AggregateRanking> {
    let mut aggregated: Vec<AggregateRanking> = responses
        .iter()
        .filter_map(|response| {
            let positions: Vec<usize> = rankings
                .iter()
                .filter_map(|r| r.position_of(&response.id))
                .collect();
            if positions.is_empty() {
                return None;
            }
            let avg_rank = positions.iter().sum::<usize>() as f64 / positions.len() as f64;
            Some(AggregateRanking {
                response_id: response.id.clone(),
                member_id: response.member_id.clone(),
                positions,
                avg_rank,
            })
        })
        .collect();

    aggregated.sort_by(|a, b| a.avg_rank.total_cmp(&b.avg_rank));
    aggregated
}
