use rand::Rng;

use crate::models::Category;

#[derive(Debug, Clone, Copy)]
pub struct Answer {
    pub category: Category,
    pub text: &'static str,
    pub text_en: &'static str,
}

pub const ANSWERS: [Answer; 20] = [
    Answer {
        category: Category::Positive,
        text: "這是必然",
        text_en: "It is certain",
    },
    Answer {
        category: Category::Positive,
        text: "肯定是的",
        text_en: "It is decidedly so",
    },
    Answer {
        category: Category::Positive,
        text: "不用懷疑",
        text_en: "Without a doubt",
    },
    Answer {
        category: Category::Positive,
        text: "毫無疑問",
        text_en: "Yes, definitely",
    },
    Answer {
        category: Category::Positive,
        text: "你能依靠它",
        text_en: "You may rely on it",
    },
    Answer {
        category: Category::Positive,
        text: "如我所見，是的",
        text_en: "As I see it, yes",
    },
    Answer {
        category: Category::Positive,
        text: "很有可能",
        text_en: "Most likely",
    },
    Answer {
        category: Category::Positive,
        text: "前景很好",
        text_en: "Outlook good",
    },
    Answer {
        category: Category::Positive,
        text: "是的",
        text_en: "Yes",
    },
    Answer {
        category: Category::Positive,
        text: "種種跡象指出「是的」",
        text_en: "Signs point to yes",
    },
    Answer {
        category: Category::Neutral,
        text: "回覆籠統，再試試",
        text_en: "Reply hazy try again",
    },
    Answer {
        category: Category::Neutral,
        text: "待會再問",
        text_en: "Ask again later",
    },
    Answer {
        category: Category::Neutral,
        text: "最好現在不告訴你",
        text_en: "Better not tell you now",
    },
    Answer {
        category: Category::Neutral,
        text: "現在無法預測",
        text_en: "Cannot predict now",
    },
    Answer {
        category: Category::Neutral,
        text: "專心再問一遍",
        text_en: "Concentrate and ask again",
    },
    Answer {
        category: Category::Negative,
        text: "想的美",
        text_en: "Don't count on it",
    },
    Answer {
        category: Category::Negative,
        text: "我的回覆是「不」",
        text_en: "My reply is no",
    },
    Answer {
        category: Category::Negative,
        text: "我的來源說「不」",
        text_en: "My sources say no",
    },
    Answer {
        category: Category::Negative,
        text: "前景不太好",
        text_en: "Outlook not so good",
    },
    Answer {
        category: Category::Negative,
        text: "很可疑",
        text_en: "Very doubtful",
    },
];

pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> &'static Answer {
    &ANSWERS[rng.gen_range(0..ANSWERS.len())]
}
