use std::cmp::Ordering;

use advent_framework::parsing::{parse_input_lines, parse_with_context};
use advent_framework::runner::solution_runner;
use advent_framework::{DynamicError, DynamicResult, ParseData, PartOne, PartTwo, Solution};
use checked_sum::CheckedSum;
use thiserror::Error;

use crate::arithmetic::Overflow;

#[solution_runner(name = "Day 7: Camel Cards", parsed = Hands, part_one = Day07, part_two = Day07)]
impl super::AdventOfCode2023<7> {}

/*
Each line is a hand of five cards and a bid. Hands are ranked by type, then by comparing cards one
position at a time from the left. Total winnings sum each bid times the hand's rank, the weakest
hand having rank 1.
*/

#[derive(Error, Debug)]
enum Day07Error {
    #[error("invalid card {0:?}")]
    InvalidCard(char),
    #[error("a hand has five cards, found {0:?}")]
    WrongHandSize(String),
    #[error("expected \"<cards> <bid>\"")]
    MissingBid,
}

/// Card labels from weakest to strongest.
const CARD_ORDER: &str = "23456789TJQKA";
const JOKER: char = 'J';

/// How `J` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rules {
    Standard,
    /// `J` is the weakest card but stands in for whatever makes the best hand type.
    Jokers,
}

impl Rules {
    /// Strength of a card label, higher is stronger.
    fn strength(self, card: char) -> usize {
        match (self, card) {
            (Self::Jokers, JOKER) => 0,
            _ => CARD_ORDER.find(card).map_or(0, |index| index + 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum HandType {
    HighCard,
    OnePair,
    TwoPairs,
    ThreeOfAKind,
    FullHouse,
    FourOfAKind,
    FiveOfAKind,
}

impl HandType {
    /// Classify by card counts sorted from most to least frequent.
    fn from_counts(counts: &[usize]) -> Self {
        match counts {
            [5, ..] => Self::FiveOfAKind,
            [4, ..] => Self::FourOfAKind,
            [3, 2, ..] => Self::FullHouse,
            [3, ..] => Self::ThreeOfAKind,
            [2, 2, ..] => Self::TwoPairs,
            [2, ..] => Self::OnePair,
            _ => Self::HighCard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Hand {
    cards: [char; 5],
    bid: u64,
}

impl Hand {
    fn hand_type(&self, rules: Rules) -> HandType {
        let mut counts: Vec<(char, usize)> = Vec::with_capacity(5);
        let mut jokers = 0;
        for &card in &self.cards {
            if rules == Rules::Jokers && card == JOKER {
                jokers += 1;
            } else if let Some((_, count)) = counts.iter_mut().find(|(label, _)| *label == card) {
                *count += 1;
            } else {
                counts.push((card, 1));
            }
        }

        // most frequent first, stronger cards first among equals; jokers join the front card
        counts.sort_unstable_by(|(a_card, a_count), (b_card, b_count)| {
            b_count
                .cmp(a_count)
                .then_with(|| rules.strength(*b_card).cmp(&rules.strength(*a_card)))
        });
        let mut sorted_counts: Vec<usize> = counts.into_iter().map(|(_, count)| count).collect();
        match sorted_counts.first_mut() {
            Some(best) => *best += jokers,
            None => sorted_counts.push(jokers),
        }
        HandType::from_counts(&sorted_counts)
    }

    fn compare(&self, other: &Self, rules: Rules) -> Ordering {
        self.hand_type(rules)
            .cmp(&other.hand_type(rules))
            .then_with(|| {
                let strengths = |hand: &Self| hand.cards.map(|card| rules.strength(card));
                strengths(self).cmp(&strengths(other))
            })
    }
}

impl std::str::FromStr for Hand {
    type Err = DynamicError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let (cards, bid) = line.split_once(' ').ok_or(Day07Error::MissingBid)?;
        if let Some(invalid) = cards.chars().find(|&card| !CARD_ORDER.contains(card)) {
            return Err(Day07Error::InvalidCard(invalid).into());
        }
        let cards: [char; 5] = cards
            .chars()
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| Day07Error::WrongHandSize(cards.to_owned()))?;
        Ok(Self {
            cards,
            bid: parse_with_context(bid.trim())?,
        })
    }
}

#[derive(Debug)]
struct Hands(Vec<Hand>);

impl ParseData for Hands {
    fn parse(input: &str) -> DynamicResult<Self> {
        let hands = parse_input_lines(input, |_, line| line.parse::<Hand>())
            .collect::<Result<_, _>>()?;
        Ok(Self(hands))
    }
}

impl Hands {
    fn total_winnings(&self, rules: Rules) -> DynamicResult<u64> {
        let mut ranked: Vec<&Hand> = self.0.iter().collect();
        ranked.sort_by(|a, b| a.compare(b, rules));
        let winnings = (1u64..)
            .zip(ranked)
            .map(|(rank, hand)| rank.checked_mul(hand.bid))
            .collect::<Option<Vec<_>>>()
            .ok_or(Overflow("hand winnings"))?;
        Ok(winnings
            .into_iter()
            .checked_sum()
            .ok_or(Overflow("total winnings"))?)
    }
}

struct Day07;

impl Solution<PartOne> for Day07 {
    type Input = Hands;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.total_winnings(Rules::Standard)
    }
}

impl Solution<PartTwo> for Day07 {
    type Input = Hands;
    type Output = u64;

    fn solve(input: &Self::Input) -> DynamicResult<Self::Output> {
        input.total_winnings(Rules::Jokers)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const EXAMPLE_INPUT: &str = "32T3K 765
T55J5 684
KK677 28
KTJJT 220
QQQJA 483
";

    fn hand(cards: &str) -> Hand {
        format!("{cards} 0").parse().unwrap()
    }

    #[test]
    fn part_one_solves_example() -> DynamicResult<()> {
        let hands = Hands::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day07 as Solution<PartOne>>::solve(&hands)?, 6440);
        Ok(())
    }

    #[test]
    fn part_two_solves_example() -> DynamicResult<()> {
        let hands = Hands::parse(EXAMPLE_INPUT)?;
        assert_eq!(<Day07 as Solution<PartTwo>>::solve(&hands)?, 5905);
        Ok(())
    }

    #[rstest]
    #[case("AAAAA", Rules::Standard, HandType::FiveOfAKind)]
    #[case("AA8AA", Rules::Standard, HandType::FourOfAKind)]
    #[case("23332", Rules::Standard, HandType::FullHouse)]
    #[case("9T8TT", Rules::Standard, HandType::ThreeOfAKind)]
    #[case("23432", Rules::Standard, HandType::TwoPairs)]
    #[case("A23A4", Rules::Standard, HandType::OnePair)]
    #[case("23456", Rules::Standard, HandType::HighCard)]
    #[case("KTJJT", Rules::Standard, HandType::TwoPairs)]
    #[case("32T3K", Rules::Jokers, HandType::OnePair)]
    #[case("KK677", Rules::Jokers, HandType::TwoPairs)]
    #[case("T55J5", Rules::Jokers, HandType::FourOfAKind)]
    #[case("KTJJT", Rules::Jokers, HandType::FourOfAKind)]
    #[case("QQQJA", Rules::Jokers, HandType::FourOfAKind)]
    #[case("2345J", Rules::Jokers, HandType::OnePair)]
    #[case("JJJJJ", Rules::Jokers, HandType::FiveOfAKind)]
    #[case("JJJJ2", Rules::Jokers, HandType::FiveOfAKind)]
    fn classifies_hands(#[case] cards: &str, #[case] rules: Rules, #[case] expected: HandType) {
        assert_eq!(hand(cards).hand_type(rules), expected);
    }

    #[rstest]
    #[case("33332", "2AAAA", Rules::Standard, Ordering::Greater)]
    #[case("77888", "77788", Rules::Standard, Ordering::Greater)]
    #[case("23332", "2AAAA", Rules::Standard, Ordering::Less)]
    #[case("23456", "23457", Rules::Standard, Ordering::Less)]
    #[case("22222", "9T8TT", Rules::Standard, Ordering::Greater)]
    #[case("25452", "35K53", Rules::Standard, Ordering::Less)]
    #[case("25452", "25652", Rules::Standard, Ordering::Less)]
    #[case("32T3K", "T55J5", Rules::Jokers, Ordering::Less)]
    #[case("T55J5", "KK677", Rules::Jokers, Ordering::Greater)]
    #[case("T55J5", "KTJJT", Rules::Jokers, Ordering::Less)]
    #[case("JKKK2", "QQQQ2", Rules::Jokers, Ordering::Less)]
    #[case("24344", "24J4A", Rules::Jokers, Ordering::Greater)]
    fn compares_hands(
        #[case] first: &str,
        #[case] second: &str,
        #[case] rules: Rules,
        #[case] expected: Ordering,
    ) {
        assert_eq!(hand(first).compare(&hand(second), rules), expected);
    }

    #[test]
    fn malformed_hands_are_rejected() {
        assert!(Hands::parse("AAAA 10").is_err());
        assert!(Hands::parse("AAXAA 10").is_err());
        assert!(Hands::parse("AAAAA").is_err());
    }
}
