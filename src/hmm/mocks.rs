//!
//! Mock HMMs for testing
//!
use super::model::HmmModel;

///
/// Two states `{A, B}` and two observations `{x, y}`
///
/// ```text
/// pi: A=0.5 B=0.5
/// transition: A->A 0.6, A->B 0.4, B->A 0.3, B->B 0.7
/// emission:   A->x 0.9, A->y 0.1, B->x 0.2, B->y 0.8
/// ```
///
pub fn mock_two_state() -> HmmModel<char, char> {
    HmmModel::builder(vec!['A', 'B'], vec!['x', 'y'])
        .initial('A', 0.5)
        .initial('B', 0.5)
        .transition('A', 'A', 0.6)
        .transition('A', 'B', 0.4)
        .transition('B', 'A', 0.3)
        .transition('B', 'B', 0.7)
        .emission('A', 'x', 0.9)
        .emission('A', 'y', 0.1)
        .emission('B', 'x', 0.2)
        .emission('B', 'y', 0.8)
        .build()
        .unwrap()
}

///
/// Same domains as `mock_two_state` but `y` is never emitted, so every
/// sequence containing `y` has zero probability.
///
pub fn mock_two_state_without_y() -> HmmModel<char, char> {
    HmmModel::new(
        vec!['A', 'B'],
        vec!['x', 'y'],
        vec![0.5, 0.5],
        vec![vec![0.6, 0.4], vec![0.3, 0.7]],
        vec![vec![1.0, 0.0], vec![1.0, 0.0]],
    )
    .unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weather {
    Sunny,
    Rainy,
}

///
/// Weather example: enum states and `String` observations
/// `walk`, `shop`, `clean`.
///
pub fn mock_weather() -> HmmModel<Weather, String> {
    weather_model(
        [0.6, 0.4],
        [[0.7, 0.3], [0.4, 0.6]],
        [[0.6, 0.3, 0.1], [0.1, 0.4, 0.5]],
    )
}

///
/// A strictly positive initial guess on the domains of `mock_weather`,
/// different from it.
///
pub fn mock_weather_guess() -> HmmModel<Weather, String> {
    weather_model(
        [0.5, 0.5],
        [[0.6, 0.4], [0.5, 0.5]],
        [[0.4, 0.3, 0.3], [0.2, 0.4, 0.4]],
    )
}

fn weather_model(
    initial: [f64; 2],
    transition: [[f64; 2]; 2],
    emission: [[f64; 3]; 2],
) -> HmmModel<Weather, String> {
    HmmModel::new(
        vec![Weather::Sunny, Weather::Rainy],
        vec!["walk".to_string(), "shop".to_string(), "clean".to_string()],
        initial.to_vec(),
        transition.iter().map(|row| row.to_vec()).collect(),
        emission.iter().map(|row| row.to_vec()).collect(),
    )
    .unwrap()
}

///
/// Occasionally dishonest casino: `&str` states and `u8` observations (die faces).
///
pub fn mock_casino() -> HmmModel<&'static str, u8> {
    let fair = vec![1.0 / 6.0; 6];
    let loaded = vec![0.1, 0.1, 0.1, 0.1, 0.1, 0.5];
    HmmModel::new(
        vec!["fair", "loaded"],
        (1..=6).collect(),
        vec![0.5, 0.5],
        vec![vec![0.95, 0.05], vec![0.1, 0.9]],
        vec![fair, loaded],
    )
    .unwrap()
}
