use nt_core::{CompartmentId, MechanismId};

/// One non-finite evaluation observed during dispatch.
///
/// Divergence is reported, never silently swallowed; whether to abort,
/// sub-step, or continue is the outer solver's decision.
#[derive(Debug, Clone, PartialEq)]
pub struct Divergence {
    /// The mechanism type that produced the value.
    pub mechanism: MechanismId,
    /// The instance index within that type's store.
    pub instance: usize,
    /// The compartment the instance is attached to.
    pub compartment: CompartmentId,
    /// The offending field: a state name, `"current"`, or `"conductance"`.
    pub field: String,
    /// The non-finite value as computed.
    pub value: f64,
}

/// Everything the dispatch engine observed during one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    divergences: Vec<Divergence>,
}

impl StepReport {
    /// Record a divergence.
    pub fn push(&mut self, divergence: Divergence) {
        self.divergences.push(divergence);
    }

    /// Fold another report's divergences into this one.
    pub fn merge(&mut self, other: StepReport) {
        self.divergences.extend(other.divergences);
    }

    /// All recorded divergences, in evaluation order.
    pub fn divergences(&self) -> &[Divergence] {
        &self.divergences
    }

    /// Number of recorded divergences.
    pub fn len(&self) -> usize {
        self.divergences.len()
    }

    /// Return `true` if the pass produced no divergences.
    pub fn is_empty(&self) -> bool {
        self.divergences.is_empty()
    }

    /// Divergences attributed to one mechanism type.
    pub fn for_mechanism(&self, id: MechanismId) -> Vec<&Divergence> {
        self.divergences
            .iter()
            .filter(|d| d.mechanism == id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diverged(mech: usize, instance: usize) -> Divergence {
        Divergence {
            mechanism: MechanismId(mech),
            instance,
            compartment: CompartmentId(instance),
            field: "current".into(),
            value: f64::NAN,
        }
    }

    #[test]
    fn merge_preserves_order() {
        let mut a = StepReport::default();
        a.push(diverged(0, 1));
        let mut b = StepReport::default();
        b.push(diverged(2, 0));
        a.merge(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.divergences()[1].mechanism, MechanismId(2));
    }

    #[test]
    fn filter_by_mechanism() {
        let mut r = StepReport::default();
        r.push(diverged(0, 0));
        r.push(diverged(1, 0));
        r.push(diverged(0, 3));
        assert_eq!(r.for_mechanism(MechanismId(0)).len(), 2);
        assert_eq!(r.for_mechanism(MechanismId(5)).len(), 0);
        assert!(!r.is_empty());
    }
}
