use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// 限制并发度地执行一组future，结果顺序与输入一致
pub async fn do_parallel_with_limit<F, T>(futures: Vec<F>, max_parallels: usize) -> Vec<T>
where
    F: Future<Output = T>,
{
    let semaphore = Arc::new(Semaphore::new(max_parallels.max(1)));

    let guarded = futures.into_iter().map(|future| {
        let semaphore = semaphore.clone();
        async move {
            // 信号量不会被关闭，acquire失败时直接执行
            let _permit = semaphore.acquire().await.ok();
            future.await
        }
    });

    join_all(guarded).await
}

/// 等待所有任务结束，分别收集成功与失败的结果
///
/// 单个任务失败不会取消其他任务，成功结果保持输入顺序。
pub async fn gather_tolerant<F, T, E>(futures: Vec<F>, max_parallels: usize) -> (Vec<T>, Vec<E>)
where
    F: Future<Output = Result<T, E>>,
{
    let results = do_parallel_with_limit(futures, max_parallels).await;

    let mut successes = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(value) => successes.push(value),
            Err(err) => failures.push(err),
        }
    }
    (successes, failures)
}
