use sentix_core::{aggregate_overall, classify_fundamental, SentimentType};

use crate::cli::{ClassifyArgs, ClassifyCommand};
use crate::error::CliError;

use super::{CommandResult, View};

pub fn run(args: &ClassifyArgs) -> Result<CommandResult, CliError> {
    let sentiment = match &args.command {
        ClassifyCommand::Fundamental { text } => classify_fundamental(text),
        ClassifyCommand::Overall {
            fundamental,
            onchain,
            technical,
        } => aggregate_overall(
            fundamental.parse::<SentimentType>()?,
            onchain.parse::<SentimentType>()?,
            technical.parse::<SentimentType>()?,
        ),
    };

    Ok(CommandResult::ok(View::Sentiment { sentiment }, Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentiment_of(result: CommandResult) -> SentimentType {
        match result.view {
            View::Sentiment { sentiment } => sentiment,
            _ => panic!("classify must produce a sentiment view"),
        }
    }

    #[test]
    fn classifies_rank_descriptions() {
        let args = ClassifyArgs {
            command: ClassifyCommand::Fundamental {
                text: String::from("Top 5% of protocols"),
            },
        };
        assert_eq!(sentiment_of(run(&args).expect("ok")), SentimentType::Bullish);
    }

    #[test]
    fn overall_rejects_unknown_sentiments() {
        let args = ClassifyArgs {
            command: ClassifyCommand::Overall {
                fundamental: String::from("bullish"),
                onchain: String::from("sideways"),
                technical: String::from("neutral"),
            },
        };
        let error = run(&args).err().expect("must fail");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn overall_uses_majority_vote() {
        let args = ClassifyArgs {
            command: ClassifyCommand::Overall {
                fundamental: String::from("Bearish"),
                onchain: String::from("bearish"),
                technical: String::from("neutral"),
            },
        };
        assert_eq!(sentiment_of(run(&args).expect("ok")), SentimentType::Bearish);
    }
}
