use nt_core::{ModelResult, Registry};

use crate::calcium::CalciumPool;
use crate::leak::Leak;
use crate::potassium::{KAhp, KMuscarinic, KRectifier};
use crate::sodium::{NaPersistent, NaTransient};

/// Register the standard mechanism roster.
///
/// This is the composition-root registration list: the call order below is
/// the registration order, which fixes type ids and the accumulator
/// reduction order for every run. Keep it explicit: discovery-based
/// registration would make evaluation order depend on link order.
pub fn standard(registry: &mut Registry) -> ModelResult<()> {
    registry.register(Leak)?;
    registry.register(NaTransient)?;
    registry.register(NaPersistent)?;
    registry.register(KRectifier)?;
    registry.register(KMuscarinic)?;
    registry.register(KAhp)?;
    registry.register(CalciumPool)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nt_core::MechanismId;

    #[test]
    fn roster_order_is_fixed() {
        let mut reg = Registry::new();
        standard(&mut reg).unwrap();
        let names: Vec<&str> = reg.iter().map(|d| d.name()).collect();
        assert_eq!(names, ["leak", "naf", "nap", "kdr", "km", "kahp", "cad"]);
        assert_eq!(reg.lookup("leak").unwrap(), MechanismId(0));
        assert_eq!(reg.lookup("cad").unwrap(), MechanismId(6));
    }

    #[test]
    fn roster_registers_exactly_once() {
        let mut reg = Registry::new();
        standard(&mut reg).unwrap();
        assert!(standard(&mut reg).is_err());
        assert_eq!(reg.len(), 7);
    }
}
