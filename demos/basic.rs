use collab_recommender::{MemoryVoteStore, Recommender};

fn main() {
    // build store
    let store: MemoryVoteStore<String, String, i32> = MemoryVoteStore::new();
    let users: Vec<String> = ["ann", "bob", "cid", "dee"].iter().map(|s| s.to_string()).collect();
    let items: Vec<String> = ["tea", "coffee", "juice", "water", "milk"].iter().map(|s| s.to_string()).collect();
    users.iter().cloned().for_each(|u| store.register_subject(u));
    items.iter().cloned().for_each(|i| store.register_object(i));

    // votes (user, item, score)
    let votes = [
        (0, 0, 5), (0, 1, 1), (0, 2, 4),
        (1, 0, 4), (1, 1, 2), (1, 2, 5), (1, 3, 5),
        (2, 0, 1), (2, 1, 5), (2, 2, 2), (2, 4, 4),
        (3, 0, 5), (3, 2, 4), (3, 3, 4), (3, 4, 1),
    ];
    for (u, i, score) in votes {
        store.record_vote(&users[u], &items[i], score);
    }

    let recommender = Recommender::new(&store, &store);

    match recommender.similar_users(&users[0], &users, &items) {
        Ok(ranking) => println!("Similar to {}: \n{}", users[0], ranking),
        Err(e) => eprintln!("similar_users failed: {}", e),
    }
    match recommender.best_items_for_user(&users[0], &users, &items) {
        Ok(ranking) => println!("Recommended for {}: \n{}", users[0], ranking),
        Err(e) => eprintln!("best_items_for_user failed: {}", e),
    }
    match recommender.best_users_for_item(&items[3], &users, &items) {
        Ok(ranking) => println!("Who might like {}: \n{:#?}", items[3], ranking),
        Err(e) => eprintln!("best_users_for_item failed: {}", e),
    }
}
