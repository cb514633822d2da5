use crate::Epoch;
use ssz_derive::{Decode, Encode};

/// Registry record. A validator's position in the registry is its index.
#[derive(Clone, Debug, PartialEq, Eq, Default, Encode, Decode)]
pub struct Validator {
    pub activation_epoch: Epoch,
    pub exit_epoch: Epoch,
}

impl Validator {
    /// Validator that is active from `activation_epoch` until it is exited.
    pub fn new(activation_epoch: Epoch, far_future_epoch: Epoch) -> Self {
        Self {
            activation_epoch,
            exit_epoch: far_future_epoch,
        }
    }

    pub fn is_active(&self, epoch: Epoch) -> bool {
        self.activation_epoch <= epoch && epoch < self.exit_epoch
    }
}
