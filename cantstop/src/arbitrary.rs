use quickcheck::{Arbitrary, Gen};

use crate::DiceSet;

/// A sequence of rolls within one turn, each with an index used to pick
/// among the offered choices.
#[derive(Clone, Debug)]
pub struct TurnScript {
    // At most 12 rolls, since longer turns almost always bust anyway
    pub rolls: Vec<(DiceSet, u8)>,
}

impl Arbitrary for TurnScript {
    fn arbitrary(g: &mut Gen) -> Self {
        let len = usize::arbitrary(g) % 13;
        let rolls = (0..len)
            .map(|_| (DiceSet::arbitrary(g), u8::arbitrary(g)))
            .collect();
        TurnScript { rolls }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(self.rolls.shrink().map(|rolls| TurnScript { rolls }))
    }
}

impl Arbitrary for DiceSet {
    fn arbitrary(g: &mut Gen) -> Self {
        let values = [(); 4].map(|_| *g.choose(&[1, 2, 3, 4, 5, 6]).unwrap());
        DiceSet::from_values(values).unwrap()
    }
}
