//! 全部常开

use super::{PowerContext, PowerStrategy};
use crate::net::Node;

#[derive(Debug, Clone, Copy, Default)]
pub struct AllOn;

impl PowerStrategy for AllOn {
    fn name(&self) -> String {
        "AllOn".into()
    }

    fn apply_strategy(&mut self, node: &mut Node, _ctx: &PowerContext) {
        if !node.is_powered() && !node.is_depleted() {
            node.power_on();
        }
    }
}
