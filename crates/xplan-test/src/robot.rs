//! Mobile-robot navigation with a speed/collision trade-off.
//!
//! The robot starts at `l1` at half speed and must reach `l3`, directly or
//! through `l2`. Travelling at full speed halves the travel time but bumps
//! into obstacles with probability 0.2 per move. Speed may be raised at `l1`
//! and lowered at `l2`; changing speed clears the bump flag.
//!
//! | plan                          | travel time | collisions |
//! |-------------------------------|-------------|------------|
//! | full speed via `l2`           | 2.0         | 0.4        |
//! | full speed direct             | 2.5         | 0.2        |
//! | half speed via `l2`           | 4.0         | 0.0        |
//! | half speed direct             | 5.0         | 0.0        |
//!
//! The objective is travel time; `travel_time` and `collision` are QA functions.

use std::sync::Arc;

use xplan_core::factor::{Discriminant, DiscriminantClass, Effect, EffectClass, Precondition, ProbabilisticEffect};
use xplan_core::objective::{AttributeCostFunction, CountQFunction, FnQFunction, Transition};
use xplan_core::{
    Action, ActionDefinition, ActionDescription, ActionSpace, CostFunction, FactoredPso,
    ModelError, Result, StatePredicate, StateSpace, StateVarDefinition, StateVarTuple,
    TransitionFunction, Value, Xmdp,
};

/// Probability of bumping into an obstacle on one full-speed move.
pub const BUMP_PROBABILITY: f64 = 0.2;

/// The robot model and handles on its parts.
#[derive(Debug, Clone)]
pub struct RobotModel {
    pub loc: StateVarDefinition,
    pub speed: StateVarDefinition,
    pub bumped: StateVarDefinition,
    pub move_to_l2: Action,
    pub move_to_l3: Action,
    pub set_speed_full: Action,
    pub set_speed_half: Action,
    pub xmdp: Xmdp,
}

impl RobotModel {
    pub fn state(&self, loc: &str, speed: &str, bumped: bool) -> StateVarTuple {
        StateVarTuple::new()
            .with(&self.loc, loc)
            .and_then(|s| s.with(&self.speed, speed))
            .and_then(|s| s.with(&self.bumped, bumped))
            .expect("robot state values are in their domains")
    }
}

fn distance(from: &str, to: &str) -> f64 {
    match (from, to) {
        ("l1", "l2") | ("l2", "l1") | ("l2", "l3") | ("l3", "l2") => 2.0,
        ("l1", "l3") | ("l3", "l1") => 5.0,
        _ => 0.0,
    }
}

fn symbol<'a>(state: &'a StateVarTuple, name: &str) -> Result<&'a str> {
    let value = state.get_by_name(name)?;
    value.as_symbol().ok_or_else(|| ModelError::ValueOutOfDomain {
        var: name.to_string(),
        value: value.to_string(),
    })
}

fn travel_time(t: &Transition<'_>) -> Result<f64> {
    if !t.action.name().starts_with("moveTo") {
        return Ok(0.0);
    }
    let speed = match symbol(t.src, "speed")? {
        "full" => 2.0,
        _ => 1.0,
    };
    Ok(distance(symbol(t.src, "loc")?, symbol(t.dest, "loc")?) / speed)
}

fn move_pso(r: &Parts) -> Result<FactoredPso> {
    let definition = ActionDefinition::new("moveTo", [r.move_to_l2.clone(), r.move_to_l3.clone()]);
    let precondition = Precondition::builder(definition.clone())
        .allow(&r.move_to_l2, &r.loc, ["l1"])?
        .allow(&r.move_to_l3, &r.loc, ["l1", "l2"])?
        .build();

    let loc_class = DiscriminantClass::new([r.loc.clone()]);
    let loc_effect = EffectClass::new([r.loc.clone()]);
    let mut locations = ActionDescription::tabular(definition.clone(), loc_class.clone(), loc_effect.clone());
    for (action, from, to) in [
        (&r.move_to_l2, "l1", "l2"),
        (&r.move_to_l3, "l1", "l3"),
        (&r.move_to_l3, "l2", "l3"),
    ] {
        locations = locations.put(
            action,
            Discriminant::new(loc_class.clone()).with(&r.loc, from)?,
            ProbabilisticEffect::deterministic(Effect::new(loc_effect.clone()).with(&r.loc, to)?)?,
        )?;
    }

    let bumped = r.bumped.clone();
    let speed = r.speed.clone();
    let bump_effect = EffectClass::new([bumped.clone()]);
    let bumps = ActionDescription::formula(
        definition,
        DiscriminantClass::new([speed.clone()]),
        bump_effect.clone(),
        move |d: &Discriminant, _: &Action| {
            let p = match d.values().get(&speed)? {
                Value::Symbol(s) if s == "full" => BUMP_PROBABILITY,
                _ => 0.0,
            };
            let mut builder = ProbabilisticEffect::builder(bump_effect.clone());
            if p > 0.0 {
                builder.add(Effect::new(bump_effect.clone()).with(&bumped, true)?, p)?;
            }
            builder.add(Effect::new(bump_effect.clone()).with(&bumped, false)?, 1.0 - p)?;
            builder.build()
        },
    );

    FactoredPso::builder(precondition)
        .with_description(locations.build())?
        .with_description(bumps)?
        .build()
}

fn speed_pso(r: &Parts) -> Result<FactoredPso> {
    let definition = ActionDefinition::new(
        "setSpeed",
        [r.set_speed_full.clone(), r.set_speed_half.clone()],
    );
    let precondition = Precondition::builder(definition.clone())
        .allow(&r.set_speed_full, &r.speed, ["half"])?
        .allow(&r.set_speed_full, &r.loc, ["l1"])?
        .allow(&r.set_speed_half, &r.speed, ["full"])?
        .allow(&r.set_speed_half, &r.loc, ["l2"])?
        .build();

    let effect_class = EffectClass::new([r.speed.clone(), r.bumped.clone()]);
    let mut description =
        ActionDescription::tabular(definition, DiscriminantClass::default(), effect_class.clone());
    for (action, speed) in [(&r.set_speed_full, "full"), (&r.set_speed_half, "half")] {
        let effect = Effect::new(effect_class.clone())
            .with(&r.speed, speed)?
            .with(&r.bumped, false)?;
        description = description.put(
            action,
            Discriminant::new(DiscriminantClass::default()),
            ProbabilisticEffect::deterministic(effect)?,
        )?;
    }

    FactoredPso::builder(precondition)
        .with_description(description.build())?
        .build()
}

struct Parts {
    loc: StateVarDefinition,
    speed: StateVarDefinition,
    bumped: StateVarDefinition,
    move_to_l2: Action,
    move_to_l3: Action,
    set_speed_full: Action,
    set_speed_half: Action,
}

fn build() -> Result<RobotModel> {
    let r = Parts {
        loc: StateVarDefinition::new("loc", ["l1", "l2", "l3"]),
        speed: StateVarDefinition::new("speed", ["half", "full"]),
        bumped: StateVarDefinition::boolean("bumped"),
        move_to_l2: Action::new("moveToL2"),
        move_to_l3: Action::new("moveToL3"),
        set_speed_full: Action::new("setSpeedFull"),
        set_speed_half: Action::new("setSpeedHalf"),
    };

    let move_pso = move_pso(&r)?;
    let speed_pso = speed_pso(&r)?;
    let action_space = ActionSpace::new([move_pso.definition().clone(), speed_pso.definition().clone()]);
    let transitions = TransitionFunction::builder()
        .with_pso(move_pso)?
        .with_pso(speed_pso)?
        .build();

    let time = Arc::new(FnQFunction::new("travel_time", travel_time));
    let collision = Arc::new(CountQFunction::new(
        "collision",
        StatePredicate::all_of(StateVarTuple::new().with(&r.bumped, true)?),
    ));
    let cost_function =
        CostFunction::new("cost").with_term(AttributeCostFunction::new(time.clone(), 0.0, 1.0), 1.0);

    let initial = StateVarTuple::new()
        .with(&r.loc, "l1")?
        .with(&r.speed, "half")?
        .with(&r.bumped, false)?;
    let xmdp = Xmdp::builder()
        .with_state_space(StateSpace::new([r.loc.clone(), r.speed.clone(), r.bumped.clone()]))
        .with_action_space(action_space)
        .with_initial_state(initial)
        .with_goal(StatePredicate::all_of(StateVarTuple::new().with(&r.loc, "l3")?))
        .with_transitions(transitions)
        .with_cost_function(cost_function)
        .with_qfunction(time)
        .with_qfunction(collision)
        .build()?;

    Ok(RobotModel {
        loc: r.loc,
        speed: r.speed,
        bumped: r.bumped,
        move_to_l2: r.move_to_l2,
        move_to_l3: r.move_to_l3,
        set_speed_full: r.set_speed_full,
        set_speed_half: r.set_speed_half,
        xmdp,
    })
}

/// Builds the robot navigation model.
pub fn robot_model() -> RobotModel {
    build().expect("robot fixture is well-formed")
}
