use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{PlannerError, Result};
use crate::model::sales::{DispatchStage, SalesChannel};
use crate::service::dto::SalesSummary;

/// Today's order counts per channel and where those orders are in dispatch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct SalesBoard {
    #[serde(default)]
    orders: BTreeMap<SalesChannel, u32>,
    #[serde(default)]
    dispatch: BTreeMap<DispatchStage, u32>,
}

impl SalesBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_orders(&mut self, channel: SalesChannel, count: u32) {
        debug!(%channel, count, "setting order count");
        self.orders.insert(channel, count);
    }

    pub fn orders(&self, channel: SalesChannel) -> u32 {
        self.orders.get(&channel).copied().unwrap_or(0)
    }

    pub fn total_orders(&self) -> u64 {
        self.orders.values().map(|c| *c as u64).sum()
    }

    pub fn set_dispatch(&mut self, stage: DispatchStage, count: u32) {
        debug!(%stage, count, "setting dispatch count");
        self.dispatch.insert(stage, count);
    }

    pub fn dispatch(&self, stage: DispatchStage) -> u32 {
        self.dispatch.get(&stage).copied().unwrap_or(0)
    }

    /// Moves `count` orders from `from` into the following stage.
    pub fn advance(&mut self, from: DispatchStage, count: u32) -> Result<()> {
        let to = from
            .next()
            .ok_or_else(|| PlannerError::invalid(format!("orders in '{}' cannot advance", from)))?;
        let waiting = self.dispatch(from);
        if count > waiting {
            return Err(PlannerError::invalid(format!(
                "cannot advance {} orders from '{}', only {} waiting",
                count, from, waiting
            )));
        }
        let target = self.dispatch(to).checked_add(count).ok_or_else(|| {
            PlannerError::invalid(format!("order count in '{}' would overflow", to))
        })?;
        self.dispatch.insert(from, waiting - count);
        self.dispatch.insert(to, target);
        debug!(%from, %to, count, "advanced orders");
        Ok(())
    }

    pub fn summary(&self) -> SalesSummary {
        SalesSummary {
            orders: SalesChannel::ALL.iter().map(|c| (*c, self.orders(*c))).collect(),
            total_orders: self.total_orders(),
            dispatch: DispatchStage::ALL.iter().map(|s| (*s, self.dispatch(*s))).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orders() {
        let mut board = SalesBoard::new();
        board.set_orders(SalesChannel::Ebay, 245);
        board.set_orders(SalesChannel::Amazon, 123);
        board.set_orders(SalesChannel::Direct, 89);
        board.set_orders(SalesChannel::Direct, 90);

        assert_eq!(board.orders(SalesChannel::Direct), 90);
        assert_eq!(board.total_orders(), 458);
    }

    #[test]
    fn test_advance_conserves_orders() {
        let mut board = SalesBoard::new();
        board.set_dispatch(DispatchStage::ToProcess, 457);
        board.set_dispatch(DispatchStage::InProgress, 234);
        board.set_dispatch(DispatchStage::Completed, 189);

        board.advance(DispatchStage::ToProcess, 57).unwrap();
        board.advance(DispatchStage::InProgress, 100).unwrap();

        assert_eq!(board.dispatch(DispatchStage::ToProcess), 400);
        assert_eq!(board.dispatch(DispatchStage::InProgress), 191);
        assert_eq!(board.dispatch(DispatchStage::Completed), 289);
        let total: u32 = DispatchStage::ALL.iter().map(|s| board.dispatch(*s)).sum();
        assert_eq!(total, 880);
    }

    #[test]
    fn test_advance_rejects() {
        let mut board = SalesBoard::new();
        board.set_dispatch(DispatchStage::ToProcess, 5);

        assert!(board.advance(DispatchStage::ToProcess, 6).is_err());
        assert!(board.advance(DispatchStage::Completed, 0).is_err());
        assert_eq!(board.dispatch(DispatchStage::ToProcess), 5);
    }

    #[test]
    fn test_summary_lists_every_channel() {
        let summary = SalesBoard::new().summary();
        assert_eq!(summary.orders.len(), 3);
        assert_eq!(summary.dispatch.len(), 3);
        assert_eq!(summary.total_orders, 0);
    }
}
