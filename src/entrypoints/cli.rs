use clap::Parser;

/// Prefix marking GET parameters that are forwarded as command line options on web
#[cfg(any(target_arch = "wasm32", test))]
const WEB_ARG_PREFIX: &str = "cli";

/// Parses from the command line arguments on native and from GET parameters on web.
///
/// On web, `?cligeocoder-url=http://localhost:8080&clizoom=5` becomes
/// `--geocoder-url http://localhost:8080 --zoom 5`.
pub fn parse_args<T: Parser>() -> Result<T, clap::Error> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        T::try_parse()
    }
    #[cfg(target_arch = "wasm32")]
    {
        let location_string = web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default();
        T::try_parse_from(args_from_url(&location_string))
    }
}

/// Translates the `cli`-prefixed GET parameters of `url` into an argv.
#[cfg(any(target_arch = "wasm32", test))]
fn args_from_url(url: &str) -> Vec<String> {
    let mut args = vec![env!("CARGO_PKG_NAME").to_string()];

    let Some((_, query)) = url.split_once('?') else {
        return args;
    };
    let query = query.split('#').next().unwrap_or_default();

    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let Some(arg_key) = key.strip_prefix(WEB_ARG_PREFIX) else {
            continue;
        };
        if !arg_key.is_empty() {
            args.push(format!("--{arg_key}"));
        }
        if !value.is_empty() {
            args.push(value.to_string());
        }
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_from_url() {
        let args = args_from_url(
            "https://example.org/app/?clizoom=5&other=1&clitiles=open-topo-map#anchor",
        );
        assert_eq!(
            args,
            ["explore-map", "--zoom", "5", "--tiles", "open-topo-map"]
        );
    }

    #[test]
    fn test_args_from_url_without_query() {
        assert_eq!(args_from_url("https://example.org/"), ["explore-map"]);
    }

    #[test]
    fn test_flag_without_value() {
        assert_eq!(
            args_from_url("https://example.org/?clihelp"),
            ["explore-map", "--help"]
        );
    }
}
