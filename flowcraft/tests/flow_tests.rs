use anyhow::Result;
use flowcraft::prelude::*;
use flowcraft::{join_all, Async};
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn select_greeting() -> Flow<String, String> {
    let greet_commoner = flow("Say hello", lift(|name: String| Ok(format!("Hello {name}"))));
    let is_king = Condition::new("is king", lift_predicate(|name: &String| name.contains("King")));
    let greet_king = flow("Greet the king", lift(|_: String| Ok("Greetings, sire".to_string())));
    let is_queen = Condition::new("is queen", lift_predicate(|name: &String| name.contains("Queen")));
    let greet_queen = flow("Greet the queen", lift(|_: String| Ok("Greetings, ma'am".to_string())));

    greet_commoner
        .or_if(is_king, greet_king)
        .or_if(is_queen, greet_queen)
}

fn select_case() -> Flow<String, String> {
    let leave_lowercase = flow("Leave lowercase", lift(|name: String| Ok::<_, anyhow::Error>(name)));
    let is_hard_of_hearing =
        Condition::new("is hard of hearing", lift_predicate(|name: &String| name.contains("Floki")));
    let make_uppercase = flow("Uppercase", lift(|name: String| Ok(name.to_uppercase())));

    leave_lowercase.or_if(is_hard_of_hearing, make_uppercase)
}

fn emphasise() -> Flow<String, String> {
    flow("Add exclamation mark", lift(|name: String| Ok(format!("{name}!"))))
}

#[tokio::test]
async fn test_greeting_flow() -> Result<()> {
    let greet = select_greeting().then(select_case()).then(emphasise());
    let messages = Arc::new(Mutex::new(Vec::new()));

    let log = messages.clone();
    let sink = move |message: &str| log.lock().unwrap().push(message.to_string());

    assert_eq!(greet.run_logging("King Rollo".into(), sink.clone()).await?, "Greetings, sire!");
    assert_eq!(greet.run_logging("Queen Quenfrith".into(), sink.clone()).await?, "Greetings, ma'am!");
    assert_eq!(greet.run_logging("Floki".into(), sink).await?, "HELLO FLOKI!");

    let messages = messages.lock().unwrap();
    let invoked = messages.iter().filter(|m| m.starts_with("Invoking")).count();
    let resolved = messages
        .iter()
        .filter(|m| m.contains(" completed with ") || m.contains(" failed with "))
        .count();
    assert_eq!(invoked, resolved);
    assert!(messages.contains(&"Action 'Greet the king' completed with <\"Greetings, sire\">".to_string()));
    Ok(())
}

#[test]
fn test_greeting_description() {
    let greet = select_greeting().then(select_case()).then(emphasise());

    assert_eq!(
        greet.describe(),
        "Sequence\
        \n\t1: Branch\
        \n\t\tIf is king: Greet the king\
        \n\t\tIf is queen: Greet the queen\
        \n\t\tOtherwise: Say hello\
        \n\t2: Branch\
        \n\t\tIf is hard of hearing: Uppercase\
        \n\t\tOtherwise: Leave lowercase\
        \n\t3: Add exclamation mark"
    );
}

#[tokio::test]
async fn test_sequence_associativity() -> Result<()> {
    let order = Arc::new(Mutex::new(Vec::new()));
    let step = |name: &'static str| {
        let order = order.clone();
        flow(
            name,
            lift(move |n: u32| {
                order.lock().unwrap().push(name);
                Ok(n * 10 + 1)
            }),
        )
    };

    let left = step("a").then(step("b")).then(step("c"));
    let right = step("a").then(step("b").then(step("c")));

    assert_eq!(left.run(0).await?, right.run(0).await?);
    assert_eq!(*order.lock().unwrap(), vec!["a", "b", "c", "a", "b", "c"]);
    assert_eq!(left.describe(), right.describe());
    Ok(())
}

#[derive(Debug, Clone)]
struct WeatherRequest {
    postcode: String,
    user: String,
}

#[derive(Debug, Clone)]
struct Weather {
    temperature: String,
}

struct WeatherService {
    calls: AtomicUsize,
}

impl WeatherService {
    fn weather_for(&self, _postcode: &str) -> Async<Weather> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            Ok(Weather {
                temperature: "26F".to_string(),
            })
        }
        .boxed()
    }
}

fn weather_flow(service: Arc<WeatherService>, credentials_ok: bool) -> Flow<WeatherRequest, String> {
    let has_valid_credentials = Condition::new("credentials ok", move |_: &WeatherRequest| async move {
        tokio::task::yield_now().await;
        Ok(credentials_ok)
    });
    let extract_postcode = flow("Extract postcode", lift(|request: WeatherRequest| Ok(request.postcode)));
    let fetch_weather = flow("Fetch weather", move |postcode: String| service.weather_for(&postcode));
    let format_weather = flow(
        "Format weather",
        lift(|weather: Weather| Ok(format!("It's {} today", weather.temperature))),
    );
    let extract_error = flow(
        "Extract error message",
        lift(|request: WeatherRequest| {
            Ok(format!("Sorry, {}, your credentials are not valid", request.user))
        }),
    );

    extract_error.or_if(
        has_valid_credentials,
        extract_postcode.then(fetch_weather).then(format_weather),
    )
}

#[tokio::test]
async fn test_weather_example() -> Result<()> {
    let request = WeatherRequest {
        postcode: "VB6 5UX".to_string(),
        user: "Arthur Putey".to_string(),
    };

    let service = Arc::new(WeatherService {
        calls: AtomicUsize::new(0),
    });
    let valid = weather_flow(service.clone(), true);
    assert_eq!(valid.run(request.clone()).await?, "It's 26F today");

    let invalid = weather_flow(service.clone(), false);
    assert_eq!(
        invalid.run(request).await?,
        "Sorry, Arthur Putey, your credentials are not valid"
    );
    assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn test_failure_propagates_through_branch_and_sequence() {
    let unavailable: Flow<u32, u32> = flow("Fetch", |_: u32| async {
        anyhow::bail!("service unavailable")
    });
    let reached = Arc::new(AtomicUsize::new(0));
    let counter = reached.clone();
    let after = flow(
        "After",
        lift(move |n: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(n)
        }),
    );

    let flow = flow("Default", lift(Ok))
        .or_if(Condition::new("always", lift_predicate(|_: &u32| true)), unavailable)
        .then(after);

    let err = flow.run(1).await.unwrap_err();
    assert_eq!(err.to_string(), "service unavailable");
    assert_eq!(reached.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_join_preserves_submission_order() -> Result<()> {
    let delayed = |value: u32, millis: u64| -> Async<u32> {
        async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Ok(value)
        }
        .boxed()
    };

    let joined = join_all([delayed(2, 30), delayed(3, 10), delayed(1, 20)]).await?;
    assert_eq!(joined, vec![2, 3, 1]);
    Ok(())
}

#[tokio::test]
async fn test_join_runs_flows_concurrently() -> Result<()> {
    let flow = flow("Square", lift(|n: u64| Ok(n * n)));

    let results = join_all((1..=4).map(|n| flow.run(n))).await?;
    assert_eq!(results, vec![1, 4, 9, 16]);
    Ok(())
}
