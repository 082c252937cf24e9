//! Count-up animation for the headline stats.

pub const COUNTER_FRAMES: u32 = 50;

/// Extracts the integer target from stat text such as `"50+"` or `"1,200"`.
pub fn parse_stat_target(text: &str) -> Result<u32, &'static str> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err("stat_text_has_no_digits");
    }

    digits.parse::<u32>().map_err(|_| "stat_target_out_of_range")
}

#[derive(Clone, Debug, PartialEq)]
pub struct CounterFrame {
    pub text: String,
    pub finished: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatCounter {
    target: u32,
    current: f64,
    increment: f64,
}

impl StatCounter {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            current: 0.0,
            increment: f64::from(target) / f64::from(COUNTER_FRAMES),
        }
    }

    pub fn from_text(text: &str) -> Result<Self, &'static str> {
        parse_stat_target(text).map(Self::new)
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    /// Advances one frame. Once the target is reached the frame is marked
    /// finished and no further frames should be scheduled.
    pub fn advance(&mut self) -> CounterFrame {
        let target = f64::from(self.target);
        if self.current < target {
            self.current = (self.current + self.increment).min(target);
            CounterFrame {
                text: format!("{}+", self.current.ceil() as u64),
                finished: false,
            }
        } else {
            CounterFrame {
                text: format!("{}+", self.target),
                finished: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_completion(counter: &mut StatCounter) -> Vec<CounterFrame> {
        let mut frames = Vec::new();
        for _ in 0..=COUNTER_FRAMES + 1 {
            let frame = counter.advance();
            let finished = frame.finished;
            frames.push(frame);
            if finished {
                break;
            }
        }
        frames
    }

    fn shown_value(frame: &CounterFrame) -> u64 {
        frame
            .text
            .trim_end_matches('+')
            .parse()
            .expect("counter text is numeric")
    }

    #[test]
    fn target_is_parsed_from_decorated_text() {
        assert_eq!(parse_stat_target("50+"), Ok(50));
        assert_eq!(parse_stat_target("1,200 projects"), Ok(1200));
        assert_eq!(parse_stat_target("0"), Ok(0));
    }

    #[test]
    fn text_without_digits_is_rejected() {
        assert_eq!(parse_stat_target("many"), Err("stat_text_has_no_digits"));
        assert_eq!(parse_stat_target(""), Err("stat_text_has_no_digits"));
        assert_eq!(
            parse_stat_target("99999999999+"),
            Err("stat_target_out_of_range")
        );
    }

    #[test]
    fn counter_climbs_monotonically_to_target() {
        let mut counter = StatCounter::new(100);
        let frames = run_to_completion(&mut counter);

        let last = frames.last().expect("at least one frame");
        assert!(last.finished);
        assert_eq!(last.text, "100+");

        let values: Vec<u64> = frames.iter().map(shown_value).collect();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(values.iter().all(|value| *value <= 100));
        assert_eq!(frames.len(), COUNTER_FRAMES as usize + 1);
    }

    #[test]
    fn zero_target_finishes_on_first_frame() {
        let mut counter = StatCounter::from_text("0+").expect("zero parses");
        let frame = counter.advance();

        assert!(frame.finished);
        assert_eq!(frame.text, "0+");
    }

    #[test]
    fn small_targets_round_up_each_frame() {
        let mut counter = StatCounter::new(3);
        let first = counter.advance();

        assert_eq!(first.text, "1+");
        assert!(!first.finished);
    }
}
