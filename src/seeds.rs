//! Built-in demo content so the service is useful without a config file.

use uuid::Uuid;

use crate::domain::{
  ComparisonType, Condition, ConditionType, Game, GameType, LogicOperator, MultipleChoiceOption, NavigationMode,
  NextRoundPossibility, Round, Slide, SlideType,
};

fn condition(id: &str, kind: ConditionType, cmp: ComparisonType, value: f64, op: Option<LogicOperator>) -> Condition {
  Condition {
    id: id.into(),
    condition_type: kind,
    comparison_type1: cmp,
    comparison_value1: value,
    comparison_type2: None,
    comparison_value2: None,
    logic_operator: op,
  }
}

fn slide(id: &str, index: u32, slide_type: SlideType, name: &str) -> Slide {
  Slide {
    id: id.into(),
    index,
    name: Some(name.into()),
    description: None,
    slide_type,
    check_method: Default::default(),
    time_limit_in_seconds: Some(30),
    early_correct_points: 10,
    late_correct_points: 0,
    early_incorrect_points: 0,
    late_incorrect_points: 0,
    points_for_time: false,
    points_for_order: false,
    multiple_choice_options: vec![],
    correct_next_slide_id: None,
    incorrect_next_slide_id: None,
    next_slide_possibilities: vec![],
  }
}

fn round(id: &str, index: u32, name: &str, mode: NavigationMode, slides: Vec<Slide>) -> Round {
  Round {
    id: id.into(),
    index,
    name: Some(name.into()),
    description: None,
    time_limit_in_minutes: Some(10),
    navigation_mode: mode,
    check_after: true,
    slides,
    next_round_possibilities: vec![],
  }
}

/// A small pubquiz: a warm-up played together, a split round that sends strong
/// players to the expert round, and a final both routes meet again in.
pub fn seed_game() -> Game {
  let mut capital = slide("demo-s2", 2, SlideType::MultipleChoice, "Capital of the Netherlands");
  capital.multiple_choice_options = ["Amsterdam", "Rotterdam", "The Hague"]
    .iter()
    .enumerate()
    .map(|(i, name)| MultipleChoiceOption {
      id: format!("demo-s2-o{}", i + 1),
      description: Some((*name).into()),
      is_regex: false,
      early_points: Some(if i == 0 { 10 } else { 0 }),
      late_points: Some(if i == 0 { 5 } else { 0 }),
      next_slide_id: None,
    })
    .collect();

  let warmup = round(
    "demo-r1",
    1,
    "Warm-up",
    NavigationMode::Together,
    vec![slide("demo-s1", 1, SlideType::Open, "Name a Dutch painter"), capital],
  );

  let mut split = round(
    "demo-r2",
    2,
    "Split",
    NavigationMode::IndividualRoutes,
    vec![slide("demo-s3", 1, SlideType::TrueFalse, "Tulips are native to the Netherlands")],
  );
  split.next_round_possibilities = vec![
    NextRoundPossibility {
      id: "demo-p1".into(),
      next_round_id: Some("demo-r3".into()),
      conditions: vec![
        condition("demo-c1", ConditionType::Points, ComparisonType::GreaterEquals, 15.0, Some(LogicOperator::Or)),
        condition("demo-c2", ConditionType::Rankings, ComparisonType::Equals, 1.0, None),
      ],
    },
    NextRoundPossibility {
      id: "demo-p2".into(),
      next_round_id: Some("demo-r4".into()),
      conditions: vec![],
    },
  ];

  let expert = round(
    "demo-r3",
    3,
    "Expert",
    NavigationMode::Individual,
    vec![slide("demo-s4", 1, SlideType::ClosestTo, "Length of the Afsluitdijk in km")],
  );
  let final_round = round(
    "demo-r4",
    4,
    "Final",
    NavigationMode::Together,
    vec![slide("demo-s5", 1, SlideType::Poll, "Best round tonight?")],
  );

  Game {
    id: "pubquiz-demo".into(),
    name: Some("Pubquiz demo".into()),
    description: Some("Built-in example game".into()),
    game_type: GameType::Pubquiz,
    time_limit_in_minutes: 60,
    rounds: vec![warmup, split, expert, final_round],
  }
}

/// Give a game loaded without an id a fresh one.
pub fn ensure_id(mut game: Game) -> Game {
  if game.id.is_empty() {
    game.id = Uuid::new_v4().to_string();
  }
  game
}
