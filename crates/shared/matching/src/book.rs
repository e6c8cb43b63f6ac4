use std::sync::Arc;

use limitbook_core::{
    Liquidity, MatchEvent, Order, OrderFilledEvent, OrderPartiallyFilledEvent, OrderRestingEvent,
    Price, Quantity, Side, Trade, TradeExecutedEvent,
};
use limitbook_ports::{MatchEventSink, MatchingError, MatchingResult, NullSink};

use crate::crossing::crosses;
use crate::ladder::{Ladder, PriceLevel};
use crate::snapshot::BookSnapshot;
use crate::validation::validate_order;

/// Outcome of one accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// The submitted order with its open quantity after matching
    pub order: Order,
    pub original_quantity: Quantity,
    /// Matches in execution order
    pub trades: Vec<Trade>,
}

impl SubmitReport {
    pub fn filled_quantity(&self) -> Quantity {
        self.original_quantity - self.order.quantity()
    }

    pub fn is_filled(&self) -> bool {
        self.order.is_filled()
    }

    /// Remainder was added to the book
    pub fn is_resting(&self) -> bool {
        !self.order.is_filled()
    }
}

/// Single-instrument continuous double auction
///
/// Owns both ladders. Not synchronized: every method takes `&self` or
/// `&mut self` and callers provide exclusion (see the engine crate for the
/// single-writer service and the locked wrapper).
pub struct MatchingCore {
    bids: Ladder,
    asks: Ladder,
    sink: Arc<dyn MatchEventSink>,
    /// Accepted submissions so far
    sequence: u64,
    next_trade_sequence: u64,
}

impl std::fmt::Debug for MatchingCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingCore")
            .field("bid_orders", &self.bids.len())
            .field("ask_orders", &self.asks.len())
            .field("sequence", &self.sequence)
            .field("next_trade_sequence", &self.next_trade_sequence)
            .finish()
    }
}

impl Default for MatchingCore {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingCore {
    /// Empty book that discards notifications
    pub fn new() -> Self {
        Self::with_sink(Arc::new(NullSink))
    }

    pub fn with_sink(sink: Arc<dyn MatchEventSink>) -> Self {
        MatchingCore {
            bids: Ladder::bids(),
            asks: Ladder::asks(),
            sink,
            sequence: 0,
            next_trade_sequence: 1,
        }
    }

    /// Number the first trade `start` instead of 1
    pub fn with_starting_trade_sequence(mut self, start: u64) -> Self {
        self.next_trade_sequence = start;
        self
    }

    /// Submit an order and return it with its unmatched remainder
    pub fn submit(&mut self, order: Order) -> MatchingResult<Order> {
        self.execute(order).map(|report| report.order)
    }

    /// Match an incoming order against the opposite ladder, then rest any
    /// remainder on its own ladder
    ///
    /// Validation happens first; a rejected order leaves the book untouched.
    /// Matching walks the opposite ladder best-first while the limit still
    /// crosses, trading at each maker's price. A maker that is only partly
    /// consumed stops the walk.
    pub fn execute(&mut self, mut order: Order) -> MatchingResult<SubmitReport> {
        validate_order(&order)?;
        self.sequence += 1;

        let original_quantity = order.quantity();
        let mut trades = Vec::new();

        let MatchingCore {
            bids,
            asks,
            sink,
            next_trade_sequence,
            ..
        } = self;
        let (opposing, own) = match order.side {
            Side::Buy => (asks, bids),
            Side::Sell => (bids, asks),
        };

        while order.quantity().is_positive() {
            let Some(key) = opposing.best_key() else {
                break;
            };
            if !crosses(order.side, order.price, key.price()) {
                break;
            }

            let Some(resting) = opposing.head_mut(&key) else {
                return Err(MatchingError::InvariantViolation(format!(
                    "empty queue left at price {} on {} ladder",
                    key.price(),
                    key.side()
                )));
            };
            if !resting.quantity().is_positive() {
                return Err(MatchingError::InvariantViolation(format!(
                    "resting order {} has non-positive quantity {}",
                    resting.id,
                    resting.quantity()
                )));
            }

            let trade_quantity = order.quantity().min(resting.quantity());
            resting.fill(trade_quantity);
            order.fill(trade_quantity);

            let trade = Trade {
                sequence: *next_trade_sequence,
                taker_order_id: order.id.clone(),
                maker_order_id: resting.id.clone(),
                taker_side: order.side,
                price: resting.price,
                quantity: trade_quantity,
            };
            *next_trade_sequence += 1;
            sink.send(MatchEvent::TradeExecuted(TradeExecutedEvent::from(&trade)));
            trades.push(trade);

            if resting.is_filled() {
                let filled = OrderFilledEvent::new(resting, Liquidity::Maker);
                opposing.remove_if_exhausted(&key);
                sink.send(MatchEvent::OrderFilled(filled));
            } else {
                sink.send(MatchEvent::OrderPartiallyFilled(OrderPartiallyFilledEvent {
                    order_id: resting.id.clone(),
                    side: resting.side,
                    price: resting.price,
                    filled_quantity: trade_quantity,
                    remaining_quantity: resting.quantity(),
                }));
                break;
            }
        }

        if order.is_filled() {
            sink.send(MatchEvent::OrderFilled(OrderFilledEvent::new(
                &order,
                Liquidity::Taker,
            )));
        } else {
            let filled = original_quantity - order.quantity();
            own.insert(order.clone());
            sink.send(MatchEvent::OrderResting(OrderRestingEvent::new(&order, filled)));
        }

        Ok(SubmitReport {
            order,
            original_quantity,
            trades,
        })
    }

    /// Resting buy orders, best first
    pub fn buy_orders(&self) -> Vec<Order> {
        self.bids.iter().cloned().collect()
    }

    /// Resting sell orders, best first
    pub fn sell_orders(&self) -> Vec<Order> {
        self.asks.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            sequence: self.sequence,
            bids: self.buy_orders(),
            asks: self.sell_orders(),
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best_price()
    }

    /// Best ask minus best bid, when both sides are present
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if ask > bid => Some(ask - bid),
            _ => None,
        }
    }

    pub fn order_count(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    pub fn bid_depth(&self, levels: usize) -> Vec<PriceLevel> {
        self.bids.depth(levels)
    }

    pub fn ask_depth(&self, levels: usize) -> Vec<PriceLevel> {
        self.asks.depth(levels)
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Sequence the next trade will carry
    pub fn next_trade_sequence(&self) -> u64 {
        self.next_trade_sequence
    }

    pub fn bids(&self) -> &Ladder {
        &self.bids
    }

    pub fn asks(&self) -> &Ladder {
        &self.asks
    }

    /// Rest `order` on its own ladder without validating or matching it
    #[cfg(any(test, feature = "test-util"))]
    pub fn rest_unchecked(&mut self, order: Order) {
        match order.side {
            Side::Buy => self.bids.insert(order),
            Side::Sell => self.asks.insert(order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use limitbook_ports::ValidationError;
    use parking_lot::Mutex;
    use proptest::prelude::*;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<MatchEvent>>,
    }

    impl MatchEventSink for RecordingSink {
        fn send(&self, event: MatchEvent) {
            self.events.lock().push(event);
        }
    }

    impl RecordingSink {
        fn take(&self) -> Vec<MatchEvent> {
            std::mem::take(&mut *self.events.lock())
        }
    }

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap() + Duration::milliseconds(ms)
    }

    fn buy(id: &str, price: i64, qty: i64, ms: i64) -> Order {
        Order::buy(id, Price::new(price), Quantity::new(qty), at(ms))
    }

    fn sell(id: &str, price: i64, qty: i64, ms: i64) -> Order {
        Order::sell(id, Price::new(price), Quantity::new(qty), at(ms))
    }

    fn quantities(orders: &[Order]) -> Vec<i64> {
        orders.iter().map(|o| o.quantity().units()).collect()
    }

    #[test]
    fn test_buy_larger_than_resting_sell_rests_remainder() {
        let mut core = MatchingCore::new();
        core.submit(sell("s1", 100, 5, 0)).unwrap();
        let remaining = core.submit(buy("b1", 100, 10, 1)).unwrap();

        assert_eq!(remaining.quantity(), Quantity::new(5));
        assert!(core.sell_orders().is_empty());
        assert_eq!(quantities(&core.buy_orders()), vec![5]);
        assert_eq!(core.buy_orders()[0].id.as_str(), "b1");
    }

    #[test]
    fn test_buy_consumes_oldest_of_two_sells() {
        let mut core = MatchingCore::new();
        core.submit(sell("s1", 100, 5, 0)).unwrap();
        core.submit(sell("s2", 100, 5, 1)).unwrap();
        let remaining = core.submit(buy("b1", 100, 5, 2)).unwrap();

        assert!(remaining.is_filled());
        assert!(core.buy_orders().is_empty());
        let asks = core.sell_orders();
        assert_eq!(asks.len(), 1);
        assert_eq!(asks[0].id.as_str(), "s2");
        assert_eq!(asks[0].quantity(), Quantity::new(5));
    }

    #[test]
    fn test_non_crossing_orders_both_rest() {
        let mut core = MatchingCore::new();
        core.submit(buy("b1", 90, 5, 0)).unwrap();
        let remaining = core.submit(sell("s1", 100, 5, 1)).unwrap();

        assert_eq!(remaining.quantity(), Quantity::new(5));
        assert_eq!(quantities(&core.buy_orders()), vec![5]);
        assert_eq!(quantities(&core.sell_orders()), vec![5]);
        assert_eq!(core.spread(), Some(Price::new(10)));
    }

    #[test]
    fn test_partial_fill_of_maker_keeps_its_place() {
        let sink = Arc::new(RecordingSink::default());
        let mut core = MatchingCore::with_sink(sink.clone());
        core.submit(sell("s1", 100, 10, 0)).unwrap();
        sink.take();

        let remaining = core.submit(buy("b1", 100, 5, 1)).unwrap();

        assert!(remaining.is_filled());
        assert!(core.buy_orders().is_empty());
        assert_eq!(quantities(&core.sell_orders()), vec![5]);

        let events = sink.take();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], MatchEvent::TradeExecuted(_)));
        match &events[1] {
            MatchEvent::OrderPartiallyFilled(e) => {
                assert_eq!(e.order_id.as_str(), "s1");
                assert_eq!(e.filled_quantity, Quantity::new(5));
                assert_eq!(e.remaining_quantity, Quantity::new(5));
            }
            other => panic!("unexpected event {:?}", other),
        }
        match &events[2] {
            MatchEvent::OrderFilled(e) => {
                assert_eq!(e.order_id.as_str(), "b1");
                assert_eq!(e.liquidity, Liquidity::Taker);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_better_price_matches_first() {
        let mut core = MatchingCore::new();
        core.submit(sell("s101", 101, 5, 0)).unwrap();
        core.submit(sell("s100", 100, 5, 1)).unwrap();

        let report = core.execute(buy("b1", 101, 5, 2)).unwrap();

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].maker_order_id.as_str(), "s100");
        assert_eq!(core.sell_orders()[0].id.as_str(), "s101");
    }

    #[test]
    fn test_trade_executes_at_maker_price() {
        let mut core = MatchingCore::new();
        core.submit(buy("b1", 105, 3, 0)).unwrap();

        let report = core.execute(sell("s1", 100, 3, 1)).unwrap();

        assert_eq!(report.trades[0].price, Price::new(105));
        assert_eq!(report.trades[0].buyer_order_id().as_str(), "b1");
        assert_eq!(report.filled_quantity(), Quantity::new(3));
    }

    #[test]
    fn test_sweeps_several_levels_then_rests() {
        let sink = Arc::new(RecordingSink::default());
        let mut core = MatchingCore::with_sink(sink.clone()).with_starting_trade_sequence(100);
        core.submit(sell("s1", 100, 2, 0)).unwrap();
        core.submit(sell("s2", 101, 3, 1)).unwrap();
        core.submit(sell("s3", 103, 4, 2)).unwrap();
        sink.take();

        let report = core.execute(buy("b1", 102, 10, 3)).unwrap();

        let sequences: Vec<u64> = report.trades.iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![100, 101]);
        assert_eq!(report.order.quantity(), Quantity::new(5));
        assert!(report.is_resting());
        assert_eq!(core.best_bid(), Some(Price::new(102)));
        assert_eq!(core.best_ask(), Some(Price::new(103)));

        let events = sink.take();
        match events.last() {
            Some(MatchEvent::OrderResting(e)) => {
                assert!(e.is_partially_filled());
                assert_eq!(e.filled_quantity, Quantity::new(5));
                assert_eq!(e.quantity, Quantity::new(5));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_identical_keys_fill_in_arrival_order() {
        let mut core = MatchingCore::new();
        core.submit(buy("first", 100, 1, 0)).unwrap();
        core.submit(buy("second", 100, 1, 0)).unwrap();
        core.submit(buy("third", 100, 1, 0)).unwrap();

        let report = core.execute(sell("s1", 100, 2, 1)).unwrap();

        let makers: Vec<&str> = report
            .trades
            .iter()
            .map(|t| t.maker_order_id.as_str())
            .collect();
        assert_eq!(makers, vec!["first", "second"]);
        assert_eq!(core.buy_orders()[0].id.as_str(), "third");
    }

    #[test]
    fn test_rejected_order_leaves_book_unchanged() {
        let sink = Arc::new(RecordingSink::default());
        let mut core = MatchingCore::with_sink(sink.clone());
        core.submit(sell("s1", 100, 5, 0)).unwrap();
        let before = core.snapshot();
        sink.take();

        let err = core.submit(buy("bad", 100, 0, 1)).unwrap_err();
        assert!(matches!(
            err,
            MatchingError::Validation(ValidationError::NonPositiveQuantity { .. })
        ));
        let err = core.submit(buy("bad", -1, 5, 1)).unwrap_err();
        assert!(matches!(
            err,
            MatchingError::Validation(ValidationError::NonPositivePrice { .. })
        ));

        assert_eq!(core.snapshot(), before);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn test_snapshot_is_stable() {
        let mut core = MatchingCore::new();
        core.submit(sell("s1", 100, 5, 0)).unwrap();
        let snapshot = core.snapshot();

        core.submit(buy("b1", 100, 5, 1)).unwrap();
        core.submit(sell("s2", 99, 7, 2)).unwrap();

        assert_eq!(snapshot.sequence, 1);
        assert_eq!(quantities(snapshot.sell_orders()), vec![5]);
        assert!(snapshot.buy_orders().is_empty());
        assert_eq!(core.sequence(), 3);
    }

    #[test]
    fn test_depth_and_counts() {
        let mut core = MatchingCore::new();
        core.submit(buy("b1", 99, 2, 0)).unwrap();
        core.submit(buy("b2", 99, 3, 1)).unwrap();
        core.submit(buy("b3", 98, 1, 2)).unwrap();

        assert_eq!(core.order_count(), 3);
        let depth = core.bid_depth(1);
        assert_eq!(depth.len(), 1);
        assert_eq!(depth[0].quantity, Quantity::new(5));
        assert_eq!(depth[0].order_count, 2);
        assert!(core.ask_depth(5).is_empty());
        assert_eq!(core.spread(), None);
    }

    #[test]
    fn test_snapshot_repeats_without_submissions() {
        let mut core = MatchingCore::new();
        core.submit(buy("b1", 99, 4, 0)).unwrap();
        core.submit(sell("s1", 101, 6, 1)).unwrap();

        assert_eq!(core.snapshot(), core.snapshot());
    }

    #[test]
    fn test_higher_bid_matches_first() {
        let mut core = MatchingCore::new();
        core.submit(buy("b99", 99, 5, 0)).unwrap();
        core.submit(buy("b101", 101, 5, 1)).unwrap();

        let report = core.execute(sell("s1", 99, 5, 2)).unwrap();

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].maker_order_id.as_str(), "b101");
        assert_eq!(report.trades[0].price, Price::new(101));
        let bids = core.buy_orders();
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].id.as_str(), "b99");
    }

    #[test]
    fn test_exhausted_resting_order_is_invariant_violation() {
        let mut core = MatchingCore::new();
        core.asks.insert(sell("ghost", 100, 0, 0));

        let err = core.execute(buy("b1", 100, 5, 1)).unwrap_err();

        assert!(matches!(err, MatchingError::InvariantViolation(_)));
        assert_eq!(core.next_trade_sequence(), 1);
    }

    fn order_stream() -> impl Strategy<Value = Vec<(bool, i64, i64)>> {
        prop::collection::vec((any::<bool>(), 95i64..105, 1i64..20), 1..200)
    }

    proptest! {
        #[test]
        fn prop_conservation_and_non_negativity(stream in order_stream()) {
            let mut core = MatchingCore::new();
            let mut net_submitted = 0i64;
            let mut traded = 0i64;

            for (i, (is_buy, price, qty)) in stream.into_iter().enumerate() {
                let id = format!("o{}", i);
                let order = if is_buy {
                    net_submitted += qty;
                    buy(&id, price, qty, i as i64)
                } else {
                    net_submitted -= qty;
                    sell(&id, price, qty, i as i64)
                };

                let report = core.execute(order).unwrap();
                let matched: i64 = report.trades.iter().map(|t| t.quantity.units()).sum();
                prop_assert_eq!(matched, report.filled_quantity().units());
                prop_assert!(report.order.quantity().units() >= 0);
                traded += matched;
            }

            let snapshot = core.snapshot();
            prop_assert!(snapshot.buy_orders().iter().all(|o| o.quantity().is_positive()));
            prop_assert!(snapshot.sell_orders().iter().all(|o| o.quantity().is_positive()));

            let net_resting = snapshot.total_bid_quantity().units() - snapshot.total_ask_quantity().units();
            prop_assert_eq!(net_resting, net_submitted);
            prop_assert!(traded >= 0);

            if let (Some(bid), Some(ask)) = (core.best_bid(), core.best_ask()) {
                prop_assert!(bid < ask);
            }
        }
    }
}
