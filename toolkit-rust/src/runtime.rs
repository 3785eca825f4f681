use {
    crate::{ProxyFunction, ProxyReply, UpstreamClient},
    log::{error, warn},
    std::collections::HashMap,
    warp::{http::StatusCode, Filter, Rejection, Reply},
};

/// Macro to bootstrap the runtime for a set of proxy functions. The macro
/// generates the necessary routes for each function and serves them on the
/// provided address. A default `GET /health` route is always added and every
/// request is logged through the `log` facade under the `hfv::proxy` target.
///
/// # Examples
///
/// ### One function
///
/// ```ignore
/// use hfv_toolkit::{bootstrap, ProxyContext};
///
/// #[tokio::main]
/// async fn main() {
///     let ctx = ProxyContext::new(upstream);
///
///     bootstrap!(([127, 0, 0, 1], 8080), ctx, YourFunction);
/// }
/// ```
///
/// ### Multiple functions
///
/// ```ignore
/// use hfv_toolkit::{bootstrap, ProxyContext};
///
/// #[tokio::main]
/// async fn main() {
///     let ctx = ProxyContext::new(upstream);
///
///     bootstrap!(([127, 0, 0, 1], 8080), ctx, [YourFunction, AnotherFunction]);
/// }
/// ```
#[macro_export]
macro_rules! bootstrap {
    ($addr:expr, $ctx:expr, [$function:ty $(, $next_function:ty)* $(,)?]) => {{
        use $crate::warp::{http::StatusCode, Filter};

        let ctx: $crate::ProxyContext = $ctx;

        // Create routes for each function in the bundle.
        let routes = $crate::routes_for_::<$function>(ctx.clone());
        $(let routes = routes.or($crate::routes_for_::<$next_function>(ctx.clone()));)*

        // Add a default health route in case there is none in the root.
        let default_health_route = $crate::warp::get()
            .and($crate::warp::path("health"))
            .and($crate::warp::path::end())
            .map(|| -> $crate::warp::reply::Response {
                $crate::warp::Reply::into_response($crate::warp::reply::with_status("", StatusCode::OK))
            });

        let routes = routes
            .or(default_health_route)
            .with($crate::warp::log("hfv::proxy"));

        let addr: ::std::net::SocketAddr = $addr.into();

        $crate::log::info!("Serving proxy functions on http://{addr}");

        // Serve the routes.
        $crate::warp::serve(routes).run(addr).await
    }};
    // Only 1 function.
    ($addr:expr, $ctx:expr, $function:ty) => {
        $crate::bootstrap!($addr, $ctx, [$function])
    };
}

/// State shared by every request: the upstream client and the error body
/// policy.
#[derive(Clone, Debug)]
pub struct ProxyContext {
    upstream: UpstreamClient,
    normalize_errors: bool,
}

impl ProxyContext {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream,
            normalize_errors: false,
        }
    }

    /// Wraps non-success text bodies into `{"error": status, "details": body}`
    /// instead of relaying them verbatim.
    pub fn with_normalized_errors(mut self, normalize_errors: bool) -> Self {
        self.normalize_errors = normalize_errors;
        self
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }
}

/// This function generates the necessary routes for a given [ProxyFunction].
///
/// **This is an internal function used by [bootstrap!] macro and should not be
/// used directly.**
#[doc(hidden)]
pub fn routes_for_<T: ProxyFunction>(
    ctx: ProxyContext,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let base_path = T::path()
        .split('/')
        .filter(|s| !s.is_empty())
        .fold(warp::any().boxed(), |filter, segment| {
            filter.and(warp::path(segment.to_string())).boxed()
        });

    let with_ctx = warp::any().map(move || ctx.clone());

    // Health path is function base URL path and `/health`.
    let health_route = warp::get()
        .and(base_path.clone())
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(with_ctx.clone())
        .and_then(health_handler::<T>);

    // Call path is the function base URL path itself.
    let call_route = warp::get()
        .and(base_path)
        .and(warp::path::end())
        .and(with_ctx)
        .and(warp::query::<HashMap<String, String>>())
        .and_then(call_handler::<T>);

    health_route.or(call_route)
}

async fn health_handler<T: ProxyFunction>(ctx: ProxyContext) -> Result<impl Reply, Rejection> {
    let function = T::new(ctx.upstream);

    let status = function
        .health()
        .await
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok(warp::reply::with_status("", status))
}

async fn call_handler<T: ProxyFunction>(
    ctx: ProxyContext,
    query: HashMap<String, String>,
) -> Result<warp::reply::Response, Rejection> {
    let normalize_errors = ctx.normalize_errors;

    // Deserialize the query string into [T::Query].
    let query = match serde_json::to_value(query).and_then(serde_json::from_value::<T::Query>) {
        Ok(query) => query,
        Err(e) => {
            warn!("{}: rejecting malformed query: {e}", T::path());

            let reply = ProxyReply::text(StatusCode::BAD_REQUEST, e.to_string());

            return Ok(reply.into_response(normalize_errors));
        }
    };

    let function = T::new(ctx.upstream);

    // Anything the function did not handle itself becomes a 500 carrying the
    // error description.
    let reply = match function.handle(query).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("{}: {e:#}", T::path());

            ProxyReply::text(StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}"))
        }
    };

    Ok(reply.into_response(normalize_errors))
}
